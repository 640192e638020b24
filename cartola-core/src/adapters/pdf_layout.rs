//! Page text rebuilt from text-positioning operators
//!
//! lopdf's `extract_text` glues consecutive show operators together, so a
//! statement whose cells are placed one by one comes out as a single run
//! with no column gaps. Here every positioned run keeps its coordinates;
//! runs are grouped into lines by baseline and joined with a two-space gap
//! when they sit apart, which is what the text strategy splits on.

use lopdf::content::{Content, Operation};
use lopdf::Object;

/// Baselines closer than this (in points) belong to the same line
const LINE_TOLERANCE: f32 = 2.0;

/// Average glyph width as a fraction of the font size
const GLYPH_WIDTH: f32 = 0.6;

/// TJ adjustments below this (thousandths of an em) read as a space
const TJ_SPACE: f32 = -250.0;

#[derive(Debug, Clone, PartialEq)]
struct Run {
    x: f32,
    y: f32,
    size: f32,
    text: String,
}

impl Run {
    fn estimated_end(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.size * GLYPH_WIDTH
    }
}

/// Text state while walking one content stream
struct TextState {
    line_x: f32,
    line_y: f32,
    scale_x: f32,
    scale_y: f32,
    leading: f32,
    font_size: f32,
    runs: Vec<Run>,
    open: Option<Run>,
}

impl TextState {
    fn new() -> Self {
        Self {
            line_x: 0.0,
            line_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            leading: 0.0,
            font_size: 10.0,
            runs: Vec::new(),
            open: None,
        }
    }

    fn close_run(&mut self) {
        if let Some(run) = self.open.take() {
            if !run.text.trim().is_empty() {
                self.runs.push(run);
            }
        }
    }

    fn begin_text(&mut self) {
        self.close_run();
        self.line_x = 0.0;
        self.line_y = 0.0;
        self.scale_x = 1.0;
        self.scale_y = 1.0;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.close_run();
        self.line_x += tx * self.scale_x;
        self.line_y += ty * self.scale_y;
    }

    fn set_matrix(&mut self, a: f32, d: f32, e: f32, f: f32) {
        self.close_run();
        self.scale_x = if a == 0.0 { 1.0 } else { a.abs() };
        self.scale_y = if d == 0.0 { 1.0 } else { d.abs() };
        self.line_x = e;
        self.line_y = f;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }

    fn show(&mut self, text: &str) {
        let (x, y, size) = (self.line_x, self.line_y, self.font_size * self.scale_y);
        self.open
            .get_or_insert_with(|| Run {
                x,
                y,
                size,
                text: String::new(),
            })
            .text
            .push_str(text);
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn operand(operation: &Operation, index: usize) -> f32 {
    operation.operands.get(index).and_then(number).unwrap_or(0.0)
}

/// Single-byte decoding; statement fonts use WinAnsi, close enough to Latin-1
fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| b as char)
        .filter(|c| !c.is_control())
        .collect()
}

fn show_array(state: &mut TextState, items: &[Object]) {
    for item in items {
        match item {
            Object::String(bytes, _) => state.show(&decode(bytes)),
            other => {
                if number(other).is_some_and(|adjust| adjust <= TJ_SPACE) {
                    state.show(" ");
                }
            }
        }
    }
}

fn collect_runs(content: &Content) -> Vec<Run> {
    let mut state = TextState::new();

    for operation in &content.operations {
        match operation.operator.as_str() {
            "BT" => state.begin_text(),
            "ET" => state.close_run(),
            "Tf" => state.font_size = operand(operation, 1),
            "TL" => state.leading = operand(operation, 0),
            "Td" => state.move_line(operand(operation, 0), operand(operation, 1)),
            "TD" => {
                state.leading = -operand(operation, 1);
                state.move_line(operand(operation, 0), operand(operation, 1));
            }
            "Tm" => state.set_matrix(
                operand(operation, 0),
                operand(operation, 3),
                operand(operation, 4),
                operand(operation, 5),
            ),
            "T*" => state.next_line(),
            "Tj" | "'" | "\"" => {
                if operation.operator != "Tj" {
                    state.next_line();
                }
                if let Some(Object::String(bytes, _)) = operation.operands.last() {
                    state.show(&decode(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operation.operands.first() {
                    show_array(&mut state, items);
                }
            }
            _ => {}
        }
    }

    state.close_run();
    state.runs
}

fn join_line(mut runs: Vec<Run>) -> String {
    runs.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut line = String::new();
    let mut previous: Option<&Run> = None;
    for run in &runs {
        if let Some(prev) = previous {
            let gap = run.x - prev.estimated_end();
            if gap >= prev.size {
                line.push_str("  ");
            } else if gap > prev.size * 0.15 {
                line.push(' ');
            }
        }
        line.push_str(run.text.trim());
        previous = Some(run);
    }
    line
}

/// Rebuild page text with one line per baseline, top to bottom
pub(crate) fn layout_text(content: &Content) -> String {
    let mut runs = collect_runs(content);
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    for run in runs {
        if let Some(first) = current.first() {
            if (first.y - run.y).abs() > LINE_TOLERANCE {
                lines.push(join_line(std::mem::take(&mut current)));
            }
        }
        current.push(run);
    }
    if !current.is_empty() {
        lines.push(join_line(current));
    }

    lines.join("\n")
}
