use core::fmt;

use super::{Dom, NodeData};
use indextree::NodeId;

fn write_indent(formatter: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        formatter.write_str("  ")?;
    }
    Ok(())
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt_children(
    dom: &Dom,
    id: NodeId,
    formatter: &mut fmt::Formatter<'_>,
    depth: usize,
) -> fmt::Result {
    for child in dom.children(id) {
        fmt_node(dom, child, formatter, depth + 1)?;
    }
    Ok(())
}

fn fmt_node(dom: &Dom, id: NodeId, formatter: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let Some(node) = dom.node(id) else {
        return Ok(());
    };
    write_indent(formatter, depth)?;
    match &node.data {
        NodeData::Document => {
            writeln!(formatter, "#document")?;
            fmt_children(dom, id, formatter, depth)?;
        }
        NodeData::ShadowRoot(mode) => {
            writeln!(formatter, "#shadow-root ({mode:?})")?;
            fmt_children(dom, id, formatter, depth)?;
        }
        NodeData::Element(element) => {
            write!(formatter, "<{}", element.local_name)?;
            let mut pairs: Vec<&(String, String)> = element.attrs.iter().collect();
            pairs.sort_by(|left, right| left.0.cmp(&right.0));
            for (key, value) in pairs {
                write!(formatter, " {key}=\"{}\"", escape_text(value))?;
            }
            writeln!(formatter, ">")?;
            // The shadow tree prints before light children, as devtools show it.
            if let Some(shadow_root) = node.shadow_root {
                fmt_node(dom, shadow_root, formatter, depth + 1)?;
            }
            fmt_children(dom, id, formatter, depth)?;
            write_indent(formatter, depth)?;
            writeln!(formatter, "</{}>", element.local_name)?;
        }
        NodeData::Text(text) => {
            writeln!(formatter, "\"{}\"", escape_text(text))?;
        }
        NodeData::Comment(text) => {
            writeln!(formatter, "<!--{text}-->")?;
        }
    }
    Ok(())
}

impl fmt::Debug for Dom {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "Dom")?;
        fmt_node(self, self.root, formatter, 0)
    }
}
