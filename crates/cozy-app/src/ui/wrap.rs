//! Soft wrapping of styled lines into screen rows.

use cozy_gemtext::{LineKind, Span, StyledLine, Tone};

/// One screen row of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub indent: usize,
    pub spans: Vec<Span>,
}

impl Row {
    fn from_cells(indent: usize, cells: &[(char, Tone)]) -> Self {
        let mut spans: Vec<Span> = Vec::new();
        for &(c, tone) in cells {
            match spans.last_mut() {
                Some(last) if last.tone == tone => last.text.push(c),
                _ => spans.push(Span::new(c.to_string(), tone)),
            }
        }
        Self { indent, spans }
    }

    #[cfg(test)]
    fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Wrap `line` to `width` columns, breaking after the last space that
/// fits. Preformatted lines are never wrapped; the surface clips them.
pub fn wrap(line: &StyledLine, width: usize) -> Vec<Row> {
    let cells: Vec<(char, Tone)> = line
        .spans
        .iter()
        .flat_map(|span| span.text.chars().map(move |c| (c, span.tone)))
        .collect();
    if cells.is_empty() || line.kind == LineKind::Verbatim {
        return vec![Row::from_cells(line.indent, &cells)];
    }

    let avail = width.saturating_sub(line.indent).max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    while start < cells.len() {
        let mut end = (start + avail).min(cells.len());
        if end < cells.len() {
            let space = cells[start..end].iter().rposition(|&(c, _)| c == ' ');
            if let Some(space) = space.filter(|&s| s > 0) {
                end = start + space + 1;
            }
        }
        rows.push(Row::from_cells(line.indent, &cells[start..end]));
        start = end;
    }
    rows
}

/// Wrap every line of a document.
pub fn wrap_all(lines: &[StyledLine], width: usize) -> Vec<Row> {
    lines.iter().flat_map(|line| wrap(line, width)).collect()
}
