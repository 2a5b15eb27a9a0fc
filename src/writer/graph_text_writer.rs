//! Appendable text sink for node rendering

use super::{CancellationToken, Cancelled, LocalData};
use crate::ir::precedence::{self, Precedence};
use crate::ir::Node;

/// Collects rendered source text.
///
/// Every node goes through `render_node`, which is where cancellation is
/// checked, so a cancelled render stops within one node of the request.
#[derive(Debug)]
pub struct GraphTextWriter {
    buffer: String,
    indent_unit: String,
    indent_level: usize,
    at_line_start: bool,
    token: CancellationToken,
    nodes_rendered: usize,
    node_limit: Option<usize>,
}

impl Default for GraphTextWriter {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

impl GraphTextWriter {
    pub fn new(token: CancellationToken) -> Self {
        Self::with_indent(token, "    ")
    }

    pub fn with_indent(token: CancellationToken, indent_unit: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            indent_unit: indent_unit.into(),
            indent_level: 0,
            at_line_start: true,
            token,
            nodes_rendered: 0,
            node_limit: None,
        }
    }

    /// Cancel the token once `limit` nodes have been rendered. Every holder
    /// of the token stops, as with a timeout.
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Append raw text, indenting first if this starts a line
    pub fn append(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.buffer.push_str(&self.indent_unit);
            }
            self.at_line_start = false;
        }
        self.buffer.push_str(text);
        self
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self.at_line_start = true;
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn unindent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Render a node in a context that imposes no parenthesization
    pub fn render_node(&mut self, node: &Node, local_data: &LocalData) -> Result<(), Cancelled> {
        self.token.check()?;
        if self.node_limit.is_some_and(|limit| self.nodes_rendered >= limit) {
            log::warn!("Render limit of {} nodes reached, cancelling", self.nodes_rendered);
            self.token.cancel();
            return Err(Cancelled);
        }
        self.nodes_rendered += 1;
        node.render(self, local_data)
    }

    /// Render an operand, parenthesized if it binds looser than `context`
    pub fn render_operand(
        &mut self,
        node: &Node,
        local_data: &LocalData,
        context: Precedence,
    ) -> Result<(), Cancelled> {
        if node.precedence() > context {
            self.append("(");
            self.render_node(node, local_data)?;
            self.append(")");
            Ok(())
        } else {
            self.render_node(node, local_data)
        }
    }

    /// Right operand of a left-associative operator: equal precedence also
    /// needs parentheses (`a - (b - c)`).
    pub fn render_right_operand(
        &mut self,
        node: &Node,
        local_data: &LocalData,
        context: Precedence,
    ) -> Result<(), Cancelled> {
        if node.precedence() >= context {
            self.append("(");
            self.render_node(node, local_data)?;
            self.append(")");
            Ok(())
        } else {
            self.render_node(node, local_data)
        }
    }

    /// Comma separated call arguments
    pub fn render_arguments(&mut self, args: &[Node], local_data: &LocalData) -> Result<(), Cancelled> {
        self.append("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.render_operand(arg, local_data, precedence::ASSIGNMENT)?;
        }
        self.append(")");
        Ok(())
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// How many nodes went through `render_node` so far
    pub fn nodes_rendered(&self) -> usize {
        self.nodes_rendered
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_applies_at_line_start() {
        let mut writer = GraphTextWriter::with_indent(CancellationToken::new(), "  ");
        writer.append("a").new_line();
        writer.indent().append("b").append("c").new_line();
        writer.unindent().append("d");
        assert_eq!(writer.finish(), "a\n  bc\nd");
    }

    #[test]
    fn test_unindent_saturates() {
        let mut writer = GraphTextWriter::default();
        writer.unindent().append("x");
        assert_eq!(writer.as_str(), "x");
    }

    #[test]
    fn test_render_node_checks_token() {
        let token = CancellationToken::new();
        token.cancel();
        let mut writer = GraphTextWriter::new(token);
        let result = writer.render_node(&Node::integer(1), &LocalData::new());
        assert_eq!(result, Err(Cancelled));
        assert_eq!(writer.nodes_rendered(), 0);
        assert_eq!(writer.as_str(), "");
    }
}
