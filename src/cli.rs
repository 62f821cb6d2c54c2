use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "instrument-selector",
    version,
    about = "Pick surgical instrument containers from a workbook and export them per doctor"
)]
pub struct Args {
    /// Source workbook to open right away, skipping the file picker
    pub workbook: Option<PathBuf>,

    /// Directory the file picker starts in
    #[arg(long)]
    pub start_dir: Option<PathBuf>,

    /// Directory holding the per-doctor workbooks (overrides the config file)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Do not open newly written workbooks
    #[arg(long)]
    pub no_open: bool,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_positional_workbook_and_flags() {
        let args = Args::parse_from([
            "instrument-selector",
            "instruments.xlsx",
            "--output-dir",
            "/srv/exports",
            "--no-open",
        ]);
        assert_eq!(args.workbook, Some(PathBuf::from("instruments.xlsx")));
        assert_eq!(args.output_dir, Some(PathBuf::from("/srv/exports")));
        assert_eq!(args.start_dir, None);
        assert!(args.no_open);
    }
}
