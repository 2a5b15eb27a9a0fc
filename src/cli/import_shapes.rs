use super::utils;
use crate::error::Result as DecompilerResult;
use crate::importers::{CharacterTable, ImportOptions, ShapeImporter};
use crate::writer::CancellationToken;
use std::path::{Path, PathBuf};

/// Arguments for the import-shapes command
#[derive(Debug, Clone)]
pub struct ImportShapesArgs {
    pub shapes_dir: PathBuf,
    pub characters_path: PathBuf,
    pub no_fill: bool,
    pub output_path: Option<PathBuf>,
}

/// Run the import-shapes subcommand and write the updated character table
pub fn import_shapes(args: &ImportShapesArgs) -> DecompilerResult<()> {
    let mut table = CharacterTable::from_path(&args.characters_path)?;
    let options = ImportOptions { fill: !args.no_fill };
    let report = ShapeImporter::bulk_import(&args.shapes_dir, &mut table, &options, &CancellationToken::new())?;

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    eprintln!("Imported {} shape(s)", report.imported);

    let output_path: Option<&Path> = args.output_path.as_deref();
    utils::write_output(&table.to_json()?, output_path)
}
