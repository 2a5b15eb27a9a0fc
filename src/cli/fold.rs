use super::utils;
use crate::analysis::{ConstantFolder, VisitedSet};
use crate::error::Result as DecompilerResult;
use crate::ir::Node;
use crate::writer::{CancellationToken, LocalData};
use std::path::Path;

/// Run the fold subcommand: fold a JSON expression and print it.
///
/// Expressions whose value is fully known also get the value printed as a
/// comment.
pub fn fold(input: &Path) -> DecompilerResult<()> {
    let node: Node = serde_json::from_str(&utils::read_text(input)?)?;
    let token = CancellationToken::new();

    let mut visited = VisitedSet::new();
    let constant = node.is_compile_time(&mut visited).then(|| node.result());
    let folded = ConstantFolder::fold(node, &token)?;

    let mut output = folded.to_source_with(&LocalData::new(), token)?;
    if let Some(value) = constant.filter(|value| value.is_foldable()) {
        output.push_str(&format!(" // {}", value));
    }
    output.push('\n');
    utils::write_output(&output, None)
}
