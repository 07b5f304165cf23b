use crate::config::MotorParams;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One pointer position as delivered by the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub timestamp: u64, // millis
}

impl Sample {
    pub fn new(x: f64, y: f64, timestamp: u64) -> Self {
        Self { x, y, timestamp }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Square target region; `origin` is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    pub origin: Point,
    pub size: f64,
}

impl TargetBox {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size / 2.0,
            self.origin.y + self.size / 2.0,
        )
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.origin.x
            && x <= self.origin.x + self.size
            && y >= self.origin.y
            && y <= self.origin.y + self.size
    }
}

/// The ideal path between the start and finish targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub start: Point,
    pub end: Point,
}

impl ReferenceLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn between(start: &TargetBox, finish: &TargetBox) -> Self {
        Self::new(start.center(), finish.center())
    }

    /// Perpendicular distance from `p` to the line through start and end.
    ///
    /// Uses the implicit form `a·x + b·y + c = 0` with `a = -m`, `b = 1`,
    /// `c = -start.y + m·start.x`. A vertical reference degenerates to the
    /// horizontal offset from `start.x`.
    pub fn distance_to_line(&self, p: Point) -> f64 {
        let (s, e) = (self.start, self.end);
        if s.x != e.x {
            let m = (e.y - s.y) / (e.x - s.x);
            let a = -m;
            let b = 1.0;
            let c = -s.y + m * s.x;
            (a * p.x + b * p.y + c).abs() / (a * a + b * b).sqrt()
        } else {
            (p.x - s.x).abs()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub box_size: f64,
    pub margin: f64,
}

impl Canvas {
    pub fn from_params(p: &MotorParams) -> Self {
        Self {
            width: p.canvas_width,
            height: p.canvas_height,
            box_size: p.box_size,
            margin: p.box_margin,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::from_params(&MotorParams::default())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MotorTestKind {
    #[strum(serialize = "horizontal")]
    Horizontal,
    #[strum(serialize = "vertical")]
    Vertical,
    #[strum(serialize = "diagonal1")]
    Diagonal1,
    #[strum(serialize = "diagonal2")]
    Diagonal2,
}

impl MotorTestKind {
    pub fn title(&self) -> &'static str {
        match self {
            MotorTestKind::Horizontal => "Horizontal Test",
            MotorTestKind::Vertical => "Vertical Test",
            MotorTestKind::Diagonal1 => "Diagonal Test 1",
            MotorTestKind::Diagonal2 => "Diagonal Test 2",
        }
    }

    /// Start and finish boxes for this test on `canvas`.
    pub fn targets(&self, canvas: &Canvas) -> (TargetBox, TargetBox) {
        let (w, h, b, m) = (canvas.width, canvas.height, canvas.box_size, canvas.margin);
        let mid_x = w / 2.0 - b / 2.0;
        let mid_y = h / 2.0 - b / 2.0;
        let far_x = w - m - b;
        let far_y = h - m - b;

        let (start, finish) = match self {
            MotorTestKind::Horizontal => ((m, mid_y), (far_x, mid_y)),
            MotorTestKind::Vertical => ((mid_x, m), (mid_x, far_y)),
            MotorTestKind::Diagonal1 => ((m, m), (far_x, far_y)),
            MotorTestKind::Diagonal2 => ((m, far_y), (far_x, m)),
        };
        (
            TargetBox::new(start.0, start.1, b),
            TargetBox::new(finish.0, finish.1, b),
        )
    }
}
