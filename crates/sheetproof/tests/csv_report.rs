//! CSV in, findings CSV out

use pretty_assertions::assert_eq;
use sheetproof::{
    CsvReadOptions, CsvReader, CsvWriteOptions, Pipeline, ReportWriter, RunContext, RunStatus,
    SpellChecker, Submission,
};

#[tokio::test]
async fn test_csv_document_to_findings_report() {
    let mut data = b"Item,Note,Amount\nPaper,Recieve the invoice,12.50\nSoftware,".to_vec();
    // Latin-1 bytes the reader cannot decode
    data.extend_from_slice(b"caf\xe9 teh,3\n");

    let workbook = CsvReader::read(&data[..], "supplies.csv", &CsvReadOptions::default()).unwrap();
    let pipeline: Pipeline<sheetproof::LanguageToolClient> = Pipeline::new(SpellChecker::default());
    let results = pipeline
        .run(vec![Submission::new(workbook, "en-US")], &RunContext::new())
        .await;

    let summary = &results[0].summary;
    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.sheets[0].sheet, "supplies");
    // Item, Note, Amount, Paper, Recieve..., Software; the undecodable cell and numbers are skipped
    assert_eq!(summary.totals.cells_checked, 6);

    let rows = summary.finding_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cell, "B2");
    assert_eq!(rows[0].excerpt, "Recieve");

    let file = tempfile::NamedTempFile::new().unwrap();
    let written = ReportWriter::write_file(&rows, file.path(), &CsvWriteOptions::default()).unwrap();
    assert_eq!(written, 1);

    let report = std::fs::read_to_string(file.path()).unwrap();
    let mut lines = report.lines();
    assert_eq!(
        lines.next(),
        Some("file,sheet,cell,severity,kind,start,end,excerpt,message,suggestions,rule,grammar_status,text")
    );
    let line = lines.next().unwrap();
    assert!(line.starts_with("supplies.csv,supplies,B2,spelling,spelling,0,7,Recieve,"));
    assert!(line.contains("disabled"));
    assert_eq!(lines.next(), None);
}
