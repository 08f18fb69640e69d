//! Depth-first Markdown rendering of a document tree.
//!
//! Each element renders its children to text first, then wraps the result
//! according to its [`TagKind`]. Block elements surround themselves with
//! newlines; the runs this produces are normalised once at the end.

use htmldown_dom::{Element, Node};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::{CodeBlockStyle, HeadingStyle, Options};
use crate::tag::TagKind;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Renders a tree with a fixed set of options and tag filters.
pub(crate) struct Renderer<'a> {
    pub options: &'a Options,
    /// Elements emitted as their HTML
    pub keep: &'a [String],
    /// Elements dropped with their content
    pub remove: &'a [String],
}

impl<'a> Renderer<'a> {
    /// Render `root` and normalise the result.
    pub fn render(&self, root: &Node) -> String {
        let raw = self.render_node(root);
        collapse_newlines(&raw).trim().to_string()
    }

    fn render_node(&self, node: &Node) -> String {
        match node {
            Node::Text(text) => text.clone(),
            Node::Element(el) => self.render_element(el),
        }
    }

    fn render_children(&self, el: &Element) -> String {
        el.children
            .iter()
            .map(|child| self.render_node(child))
            .collect()
    }

    fn render_element(&self, el: &Element) -> String {
        if self.remove.contains(&el.name) {
            return String::new();
        }
        if self.keep.contains(&el.name) {
            return el.outer_html();
        }

        match TagKind::from_name(&el.name) {
            TagKind::Heading(level) => self.heading(level, &self.render_children(el)),
            TagKind::Strong => wrap(&self.render_children(el), &self.options.strong_delimiter),
            TagKind::Emphasis => {
                let delimiter = self.options.em_delimiter.to_string();
                wrap(&self.render_children(el), &delimiter)
            }
            TagKind::Strikethrough => {
                wrap(&self.render_children(el), &self.options.strike_delimiter)
            }
            TagKind::Code => code_span(&el.text_content()),
            TagKind::Preformatted => self.code_block(el),
            TagKind::Link => {
                let href = el.attr("href").unwrap_or("");
                format!("[{}]({}{})", self.render_children(el), href, self.title(el))
            }
            TagKind::Image => {
                let alt = el.attr("alt").unwrap_or("");
                let src = el.attr("src").unwrap_or("");
                format!("![{}]({}{})", alt, src, self.title(el))
            }
            TagKind::BlockQuote => blockquote(&self.render_children(el)),
            TagKind::UnorderedList | TagKind::OrderedList => self.list(el),
            TagKind::ListItem => {
                let marker = format!("{} ", self.options.bullet_list_marker);
                format!("\n{}\n", list_item(&marker, &self.render_children(el)))
            }
            TagKind::Table => self.table(el),
            TagKind::HorizontalRule => format!("\n{}\n", self.options.hr),
            TagKind::Paragraph => format!("\n{}\n", self.render_children(el)),
            TagKind::LineBreak => "  \n".to_string(),
            TagKind::Transparent => self.render_children(el),
        }
    }

    fn heading(&self, level: u8, content: &str) -> String {
        let content = content.trim();
        if content.is_empty() {
            return "\n".to_string();
        }

        match self.options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                let width = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                format!("\n{}\n{}\n", content, underline.repeat(width.max(3)))
            }
            _ => format!("\n{} {}\n", "#".repeat(level as usize), content),
        }
    }

    fn title(&self, el: &Element) -> String {
        match el.attr("title") {
            Some(title) if self.options.link_titles && !title.is_empty() => {
                format!(" \"{}\"", title.replace('"', "\\\""))
            }
            _ => String::new(),
        }
    }

    /// `pre`, usually wrapping a `code` element. The block is the text of
    /// the whole `pre`; a `code` child only contributes its language.
    fn code_block(&self, pre: &Element) -> String {
        let code = pre.element_children().find(|c| c.name == "code");
        let text = pre.text_content();
        let text = text.trim();

        match self.options.code_block_style {
            CodeBlockStyle::Fenced => {
                let language = code
                    .filter(|_| self.options.fence_language)
                    .and_then(code_language)
                    .unwrap_or("");
                let fence = fence_for(text, &self.options.fence);
                format!("\n{}{}\n{}\n{}\n", fence, language, text, fence)
            }
            CodeBlockStyle::Indented => {
                let indented: Vec<String> = text
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            String::new()
                        } else {
                            format!("    {}", line)
                        }
                    })
                    .collect();
                format!("\n{}\n", indented.join("\n"))
            }
        }
    }

    /// `li` items, including those inside wrappers such as `div`, each on
    /// its own line. Other content keeps its place as a separate block.
    fn list(&self, list: &Element) -> String {
        let mut entries = Vec::new();
        let mut items = 0;
        self.list_entries(list, list.name == "ol", &mut items, &mut entries);

        let mut out = String::new();
        let mut previous_item = None;
        for entry in entries {
            if let Some(previous_item) = previous_item {
                out.push_str(if previous_item && entry.item { "\n" } else { "\n\n" });
            }
            out.push_str(&entry.text);
            previous_item = Some(entry.item);
        }

        if out.is_empty() {
            return out;
        }
        format!("\n{}\n", out)
    }

    fn list_entries(
        &self,
        parent: &Element,
        ordered: bool,
        items: &mut usize,
        entries: &mut Vec<ListEntry>,
    ) {
        for child in &parent.children {
            let element = child.as_element().filter(|el| self.is_plain(el));
            match element {
                Some(li) if li.name == "li" => {
                    *items += 1;
                    let marker = if ordered {
                        format!("{}. ", items)
                    } else {
                        format!("{} ", self.options.bullet_list_marker)
                    };
                    entries.push(ListEntry {
                        item: true,
                        text: list_item(&marker, &self.render_children(li)),
                    });
                }
                Some(wrapper)
                    if TagKind::from_name(&wrapper.name) == TagKind::Transparent
                        && has_list_item(wrapper) =>
                {
                    self.list_entries(wrapper, ordered, items, entries);
                }
                _ => {
                    let text = collapse_newlines(&self.render_node(child));
                    let text = text.trim();
                    if !text.is_empty() {
                        entries.push(ListEntry {
                            item: false,
                            text: text.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Not subject to a keep or remove filter
    fn is_plain(&self, el: &Element) -> bool {
        !self.keep.contains(&el.name) && !self.remove.contains(&el.name)
    }

    fn table(&self, table: &Element) -> String {
        let rows: Vec<Vec<String>> = table_rows(table)
            .into_iter()
            .map(|tr| {
                tr.element_children()
                    .filter(|cell| cell.name == "th" || cell.name == "td")
                    .map(|cell| table_cell(&self.render_children(cell)))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        let Some(header) = rows.first() else {
            return String::new();
        };

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(table_row(header));
        lines.push(table_row(&vec!["---".to_string(); header.len()]));
        lines.extend(rows[1..].iter().map(|row| table_row(row)));

        format!("\n{}\n", lines.join("\n"))
    }
}

struct ListEntry {
    item: bool,
    text: String,
}

/// Whether an `li` sits anywhere below `el` without crossing another list.
fn has_list_item(el: &Element) -> bool {
    el.element_children().any(|child| match child.name.as_str() {
        "li" => true,
        "ul" | "ol" => false,
        _ => has_list_item(child),
    })
}

/// Collapse runs of three or more newlines to exactly two.
pub(crate) fn collapse_newlines(s: &str) -> String {
    NEWLINE_RUNS.replace_all(s, "\n\n").into_owned()
}

/// Wrap inline content in a delimiter, unless there is nothing to emphasise.
fn wrap(content: &str, delimiter: &str) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }
    format!("{}{}{}", delimiter, content, delimiter)
}

/// Inline code; content containing backticks gets a longer delimiter.
fn code_span(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let max_consecutive_backticks = content
        .chars()
        .fold((0, 0), |(max, current), c| {
            if c == '`' {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0;

    if max_consecutive_backticks == 0 {
        return format!("`{}`", content);
    }

    let backticks = "`".repeat(max_consecutive_backticks + 1);
    let needs_space = content.starts_with('`') || content.ends_with('`');
    if needs_space {
        format!("{} {} {}", backticks, content, backticks)
    } else {
        format!("{}{}{}", backticks, content, backticks)
    }
}

/// A fence longer than any run of the fence character inside `code`.
fn fence_for(code: &str, fence: &str) -> String {
    let Some(mark) = fence.chars().next() else {
        return fence.to_string();
    };
    let mut fence = fence.to_string();
    while code.contains(fence.as_str()) {
        fence.push(mark);
    }
    fence
}

/// Language from a `language-xxx` or `lang-xxx` class
fn code_language(code: &Element) -> Option<&str> {
    code.attr("class")?.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
    })
}

fn blockquote(content: &str) -> String {
    let content = collapse_newlines(content);
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }

    let quoted: Vec<String> = content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect();
    format!("\n{}\n", quoted.join("\n"))
}

/// One list item: the marker, then the content with continuation lines
/// indented to line up under the first.
fn list_item(marker: &str, content: &str) -> String {
    let content = collapse_newlines(content);
    let indent = " ".repeat(marker.chars().count());

    let mut out = String::from(marker);
    for (i, line) in content.trim().lines().enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.trim().is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }
    out
}

/// `tr` elements of a table, including those inside row groups.
fn table_rows(table: &Element) -> Vec<&Element> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        match child.name.as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child.element_children().filter(|tr| tr.name == "tr"))
            }
            _ => {}
        }
    }
    rows
}

/// Cell content on a single line
fn table_cell(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
