//! Text dump of the board for the diagnostic channel.

use organ_growth_core::Cell;

use super::{Board, Classification};

impl Board {
    /// Renders one line per row with space-separated cell glyphs.
    ///
    /// `#` wall, `.` empty, `O` own organ, `X` enemy organ, and the lower-case
    /// protein letter for resource cells.
    #[must_use]
    pub fn render(&self) -> String {
        let width = usize::try_from(self.width()).unwrap_or(0);
        if width == 0 {
            return String::new();
        }

        let mut out = String::with_capacity(self.cells.len() * 2);
        for row in self.cells.chunks(width) {
            for (column, classification) in row.iter().enumerate() {
                if column > 0 {
                    out.push(' ');
                }
                out.push(glyph(*classification));
            }
            out.push('\n');
        }
        out
    }

    /// Renders the board with the provided path cells marked by `*`.
    #[must_use]
    pub fn render_with_path(&self, path: &[Cell]) -> String {
        let mut out = String::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let cell = Cell::new(x, y);
                if x > 0 {
                    out.push(' ');
                }
                let classification = self.classify(cell).unwrap_or_default();
                let marker = if classification == Classification::Empty && path.contains(&cell) {
                    '*'
                } else {
                    glyph(classification)
                };
                out.push(marker);
            }
            out.push('\n');
        }
        out
    }
}

fn glyph(classification: Classification) -> char {
    match classification {
        Classification::Empty => '.',
        Classification::Wall => '#',
        Classification::OwnedOrgan => 'O',
        Classification::EnemyOrgan => 'X',
        Classification::Resource(kind) => kind.letter().to_ascii_lowercase(),
    }
}
