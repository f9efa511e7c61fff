#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Diamond];

    /// Only the circle is the discriminative stimulus.
    pub fn is_rewarded(self) -> bool {
        self == Shape::Circle
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Shape::Circle => "●",
            Shape::Square => "■",
            Shape::Triangle => "▲",
            Shape::Diamond => "◆",
        }
    }
}

/// Untimed point counter: circle earns a point, anything else costs one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscriminationBoard {
    points: u32,
    presses: u32,
}

impl DiscriminationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Returns the new point total. Never drops below zero.
    pub fn press(&mut self, shape: Shape) -> u32 {
        self.presses += 1;
        self.points = if shape.is_rewarded() {
            self.points + 1
        } else {
            self.points.saturating_sub(1)
        };
        self.points
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
