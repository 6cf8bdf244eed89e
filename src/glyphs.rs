use ratatui::text::{Line, Span};

use crate::context::TreeRowContext;
use crate::cursor::Placement;
use crate::node::TreeNode;

#[derive(Clone, Copy, Debug)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    pub drop_before: &'a str,
    pub drop_after: &'a str,
    pub drop_inside: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            leaf: "•",
            expanded: "▼",
            collapsed: "▶",
            drop_before: " ⤒",
            drop_after: " ⤓",
            drop_inside: " ⇥",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            leaf: "*",
            expanded: "v",
            collapsed: ">",
            drop_before: " ^",
            drop_after: " _",
            drop_inside: " <-",
        }
    }
}

impl<'a> TreeGlyphs<'a> {
    const fn marker(&self, placement: Placement) -> &'a str {
        match placement {
            Placement::Before => self.drop_before,
            Placement::After => self.drop_after,
            Placement::Inside => self.drop_inside,
        }
    }

    const fn toggle(&self, ctx: &TreeRowContext<'_>) -> &'a str {
        if ctx.is_leaf {
            self.leaf
        } else if ctx.is_expanded {
            self.expanded
        } else {
            self.collapsed
        }
    }
}

/// Turns a projected node into the text of its row.
pub trait TreeLabelRenderer<D> {
    fn line<'a>(
        &self,
        node: &TreeNode<D>,
        ctx: &TreeRowContext<'_>,
        glyphs: &TreeGlyphs<'a>,
    ) -> Line<'a>;
}

/// Renders the node title behind the indentation and toggle glyphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TitleLabel;

impl<D> TreeLabelRenderer<D> for TitleLabel {
    fn line<'a>(
        &self,
        node: &TreeNode<D>,
        ctx: &TreeRowContext<'_>,
        glyphs: &TreeGlyphs<'a>,
    ) -> Line<'a> {
        tree_label_line(ctx, node.title.clone(), glyphs)
    }
}

impl<D, F> TreeLabelRenderer<D> for F
where
    F: Fn(&TreeNode<D>) -> String,
{
    fn line<'a>(
        &self,
        node: &TreeNode<D>,
        ctx: &TreeRowContext<'_>,
        glyphs: &TreeGlyphs<'a>,
    ) -> Line<'a> {
        tree_label_line(ctx, self(node), glyphs)
    }
}

pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    name: String,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let mut spans = Vec::with_capacity(ctx.is_tail_stack.len() + 4);

    if ctx.draw_lines && ctx.level > 1 {
        // Root-level rows carry no branch; the stack starts one level down.
        let last = ctx.is_tail_stack.len().saturating_sub(1);
        for (depth, is_last) in ctx.is_tail_stack.iter().enumerate().skip(1) {
            let part = if depth == last {
                if *is_last { glyphs.branch_last } else { glyphs.branch }
            } else if *is_last {
                glyphs.indent
            } else {
                glyphs.vert
            };
            spans.push(Span::styled(part, ctx.line_style));
        }
    } else {
        for _ in 1..ctx.level {
            spans.push(Span::raw(glyphs.empty));
        }
    }

    spans.push(Span::raw(glyphs.toggle(ctx)));
    spans.push(Span::raw(" "));
    spans.push(Span::raw(name));
    if let Some(placement) = ctx.drop_marker {
        spans.push(Span::raw(glyphs.marker(placement)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    fn ctx(level: usize, tail: &[bool], draw_lines: bool) -> TreeRowContext<'_> {
        TreeRowContext {
            level,
            is_tail_stack: tail,
            is_expanded: true,
            is_leaf: true,
            has_children: false,
            is_selected: false,
            drop_marker: None,
            draw_lines,
            line_style: Style::default(),
        }
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn indents_without_lines() {
        let ctx = ctx(3, &[false, true, false], false);
        let line = tree_label_line(&ctx, "leaf".into(), &TreeGlyphs::ascii());
        assert_eq!(text(&line), "      * leaf");
    }

    #[test]
    fn draws_branches_with_lines() {
        let ctx = ctx(3, &[false, false, true], true);
        let line = tree_label_line(&ctx, "leaf".into(), &TreeGlyphs::ascii());
        assert_eq!(text(&line), "|  `--* leaf");
    }

    #[test]
    fn appends_drop_marker() {
        let mut row = ctx(1, &[true], false);
        row.is_leaf = false;
        row.drop_marker = Some(Placement::Inside);
        let line = tree_label_line(&row, "dir".into(), &TreeGlyphs::ascii());
        assert_eq!(text(&line), "v dir <-");
    }
}
