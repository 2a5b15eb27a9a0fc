//! Main decompiler module
//!
//! Turns method bodies, already lifted to statement trees, into source text.
//! Batches run in parallel; every body observes the caller's cancellation
//! token and reports cancellation separately from failure.

use crate::abc::QualifiedName;
use crate::analysis::ConstantFolder;
use crate::error::{Error, Result};
use crate::ir::Node;
use crate::writer::local_data::DEFAULT_LOCAL_PREFIX;
use crate::writer::{CancellationToken, Cancelled, GraphTextWriter, LocalData};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Decompiler settings, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompileOptions {
    pub indent: String,
    pub local_name_prefix: String,
    pub fold_constants: bool,
    /// Batches smaller than this run on the calling thread
    pub parallel_threshold: usize,
    pub show_progress: bool,
    /// Nodes one method may render before the run is cancelled
    pub max_rendered_nodes: Option<usize>,
}

impl Default for DecompileOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            local_name_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            fold_constants: false,
            parallel_threshold: 8,
            show_progress: false,
            max_rendered_nodes: None,
        }
    }
}

impl DecompileOptions {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        if options.local_name_prefix.is_empty() {
            return Err(Error::config("local_name_prefix must not be empty"));
        }
        Ok(options)
    }
}

/// One method as handed over by the bytecode layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodBody {
    pub name: String,
    pub statements: Vec<Node>,
    /// Debug names by register
    #[serde(default)]
    pub local_names: BTreeMap<u32, String>,
    #[serde(default)]
    pub class_name: Option<QualifiedName>,
    #[serde(default)]
    pub is_static: bool,
}

impl MethodBody {
    pub fn new(name: impl Into<String>, statements: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            statements,
            local_names: BTreeMap::new(),
            class_name: None,
            is_static: false,
        }
    }

    fn local_data(&self, prefix: &str) -> LocalData {
        let mut local_data = LocalData::with_prefix(prefix);
        for (register, name) in &self.local_names {
            local_data.set_local_name(*register, name.clone());
        }
        match &self.class_name {
            Some(class_name) => local_data.with_class(class_name.clone(), self.is_static),
            None => local_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecompiledMethod {
    pub name: String,
    pub source: String,
    pub nodes_rendered: usize,
}

/// Main decompiler struct
#[derive(Debug, Clone, Default)]
pub struct Decompiler {
    options: DecompileOptions,
}

impl Decompiler {
    pub fn new(options: DecompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecompileOptions {
        &self.options
    }

    /// Render one method body
    pub fn decompile_method(
        &self,
        method: &MethodBody,
        token: &CancellationToken,
    ) -> std::result::Result<DecompiledMethod, Cancelled> {
        let local_data = method.local_data(&self.options.local_name_prefix);
        let mut writer = GraphTextWriter::with_indent(token.clone(), self.options.indent.as_str());
        if let Some(limit) = self.options.max_rendered_nodes {
            writer = writer.with_node_limit(limit);
        }

        writer.append("function ").append(&method.name).append("()");
        writer.new_line();
        writer.append("{").new_line().indent();
        for statement in &method.statements {
            if self.options.fold_constants {
                let folded = ConstantFolder::fold(statement.clone(), token)?;
                writer.render_node(&folded, &local_data)?;
            } else {
                writer.render_node(statement, &local_data)?;
            }
            writer.append(";").new_line();
        }
        writer.unindent().append("}").new_line();

        let nodes_rendered = writer.nodes_rendered();
        log::debug!("Rendered {} ({} nodes)", method.name, nodes_rendered);
        Ok(DecompiledMethod {
            name: method.name.clone(),
            source: writer.finish(),
            nodes_rendered,
        })
    }

    /// Render a batch, keeping input order.
    ///
    /// Runs in parallel once the batch reaches `parallel_threshold`. A
    /// cancelled body yields `Err(Cancelled)` in its slot; the others are
    /// unaffected unless they share the token.
    pub fn decompile_all(
        &self,
        methods: &[MethodBody],
        token: &CancellationToken,
    ) -> Vec<std::result::Result<DecompiledMethod, Cancelled>> {
        let progress_bar = if self.options.show_progress {
            let bar = ProgressBar::new(methods.len() as u64);
            let style = ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} methods")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            bar.set_style(style);
            bar
        } else {
            ProgressBar::hidden()
        };

        let render = |method: &MethodBody| {
            let result = self.decompile_method(method, token);
            progress_bar.inc(1);
            result
        };
        let results: Vec<_> = if methods.len() >= self.options.parallel_threshold {
            log::debug!("Decompiling {} methods in parallel", methods.len());
            methods.par_iter().map(render).collect()
        } else {
            methods.iter().map(render).collect()
        };
        progress_bar.finish_and_clear();

        let cancelled = results.iter().filter(|result| result.is_err()).count();
        if cancelled > 0 {
            log::warn!("{} of {} methods were cancelled", cancelled, methods.len());
        }
        results
    }
}
