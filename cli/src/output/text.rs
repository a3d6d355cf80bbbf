use crate::commands::compare::Verbosity;
use codesim::{SimilarityReport, UnitProfile};
use std::io::{self, Write};

pub fn write_compare_report<W: Write>(
    writer: &mut W,
    report: &SimilarityReport,
    path_a: &str,
    path_b: &str,
    verbosity: Verbosity,
    profiles: Option<(UnitProfile, UnitProfile)>,
) -> io::Result<()> {
    if verbosity == Verbosity::Quiet {
        return writeln!(writer, "{:.4}", report.similarity);
    }

    writeln!(
        writer,
        "{} vs {} - similarity: {:.4} (matched weight: {}, a: {}, b: {})",
        path_a, path_b, report.similarity, report.matched_weight, report.weight_a, report.weight_b
    )?;

    if let Some((profile_a, profile_b)) = profiles {
        write_profile(writer, path_a, &profile_a)?;
        write_profile(writer, path_b, &profile_b)?;
    }

    Ok(())
}

pub fn write_profile<W: Write>(
    writer: &mut W,
    path: &str,
    profile: &UnitProfile,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}: {} blocks, {} instructions, {} line-grams, weight {}",
        path, profile.blocks, profile.instructions, profile.grams, profile.weight
    )
}
