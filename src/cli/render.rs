use super::utils;
use crate::decompiler::{DecompileOptions, Decompiler, MethodBody};
use crate::error::{Error as DecompilerError, Result as DecompilerResult};
use std::path::{Path, PathBuf};

/// Arguments for the render command
#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub inputs: Vec<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub fold: bool,
    pub timeout_ms: Option<u64>,
    pub max_nodes: Option<usize>,
}

impl RenderArgs {
    /// Config file values, with command-line flags on top
    pub fn to_options(&self) -> DecompilerResult<DecompileOptions> {
        let mut options = match &self.config_path {
            Some(path) => DecompileOptions::from_path(path)?,
            None => DecompileOptions::default(),
        };
        if self.fold {
            options.fold_constants = true;
        }
        if self.max_nodes.is_some() {
            options.max_rendered_nodes = self.max_nodes;
        }
        Ok(options)
    }
}

/// A file holds either one method body or a list of them
fn load_methods(path: &Path) -> DecompilerResult<Vec<MethodBody>> {
    let text = utils::read_text(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

/// Run the render subcommand
pub fn render(args: &RenderArgs) -> DecompilerResult<()> {
    let options = args.to_options()?;
    let mut methods = Vec::new();
    for input in &args.inputs {
        methods.extend(load_methods(input)?);
    }
    log::info!("Loaded {} method bodies from {} files", methods.len(), args.inputs.len());

    let token = utils::token_with_timeout(args.timeout_ms);
    let decompiler = Decompiler::new(options);
    let results = decompiler.decompile_all(&methods, &token);

    let mut output = String::new();
    for (index, result) in results.into_iter().enumerate() {
        let method = result.map_err(DecompilerError::from)?;
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&method.source);
    }
    utils::write_output(&output, args.output_path.as_deref())
}
