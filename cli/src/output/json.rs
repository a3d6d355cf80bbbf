use codesim::SimilarityReport;
use serde_json::json;
use std::io::{self, Write};

pub fn write_compare_report<W: Write>(
    writer: &mut W,
    report: &SimilarityReport,
    path_a: &str,
    path_b: &str,
) -> io::Result<()> {
    let value = json!({
        "a": path_a,
        "b": path_b,
        "similarity": report.similarity,
        "matched_weight": report.matched_weight,
        "weight_a": report.weight_a,
        "weight_b": report.weight_b,
    });
    serde_json::to_writer_pretty(&mut *writer, &value)?;
    writeln!(writer)
}
