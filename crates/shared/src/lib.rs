use std::path::Path;

use serde::{Deserialize, Serialize};

/// Объёмный примитив (параметры как в диалогах создания)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Cube {
        #[serde(default = "default_one")]
        size: f64,
    },
    Sphere {
        #[serde(default = "default_one")]
        radius: f64,
        #[serde(default = "default_resolution")]
        resolution: u32,
    },
    Cone {
        #[serde(default = "default_half")]
        radius: f64,
        #[serde(default = "default_one")]
        height: f64,
        #[serde(default = "default_resolution")]
        resolution: u32,
    },
    Cylinder {
        #[serde(default = "default_half")]
        radius: f64,
        #[serde(default = "default_one")]
        height: f64,
        #[serde(default = "default_resolution")]
        resolution: u32,
    },
    Pyramid {
        #[serde(default = "default_sides")]
        sides: u32,
        #[serde(default = "default_one")]
        side_length: f64,
        #[serde(default = "default_one")]
        height: f64,
    },
}

impl Primitive {
    /// Имя по умолчанию для нового объекта ("Cube", "Sphere", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            Primitive::Cube { .. } => "Cube",
            Primitive::Sphere { .. } => "Sphere",
            Primitive::Cone { .. } => "Cone",
            Primitive::Cylinder { .. } => "Cylinder",
            Primitive::Pyramid { .. } => "Pyramid",
        }
    }

    /// Параметры с допустимыми диапазонами
    pub fn parameters(&self) -> Vec<Parameter> {
        match self {
            Primitive::Cube { size } => vec![Parameter::new("Size", *size, 0.1, 10.0)],
            Primitive::Sphere { radius, resolution } => vec![
                Parameter::new("Radius", *radius, 0.1, 10.0),
                Parameter::new("Resolution", *resolution as f64, 3.0, 100.0),
            ],
            Primitive::Cone {
                radius,
                height,
                resolution,
            }
            | Primitive::Cylinder {
                radius,
                height,
                resolution,
            } => vec![
                Parameter::new("Radius", *radius, 0.1, 10.0),
                Parameter::new("Height", *height, 0.1, 10.0),
                Parameter::new("Resolution", *resolution as f64, 3.0, 100.0),
            ],
            Primitive::Pyramid {
                sides,
                side_length,
                height,
            } => vec![
                Parameter::new("Sides", *sides as f64, 3.0, 12.0),
                Parameter::new("SideLength", *side_length, 0.1, 10.0),
                Parameter::new("Height", *height, 0.1, 10.0),
            ],
        }
    }
}

/// Плоская фигура (рисуется на рабочей плоскости)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape2D {
    Point {
        x: f64,
        y: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// Прямоугольник с центром в начале координат
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
        #[serde(default = "default_resolution")]
        resolution: u32,
    },
}

impl Shape2D {
    pub fn display_name(&self) -> &'static str {
        match self {
            Shape2D::Point { .. } => "Point",
            Shape2D::Line { .. } => "Line",
            Shape2D::Rectangle { .. } => "Rectangle",
            Shape2D::Circle { .. } => "Circle",
        }
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        match self {
            Shape2D::Point { .. } | Shape2D::Line { .. } => Vec::new(),
            Shape2D::Rectangle { width, height } => vec![
                Parameter::new("Width", *width, 0.01, 1000.0),
                Parameter::new("Height", *height, 0.01, 1000.0),
            ],
            Shape2D::Circle { radius, resolution } => vec![
                Parameter::new("Radius", *radius, 0.01, 1000.0),
                Parameter::new("Resolution", *resolution as f64, 3.0, 360.0),
            ],
        }
    }
}

/// Числовой параметр с допустимым диапазоном
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl Parameter {
    pub fn new(name: &str, value: f64, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            min,
            max,
        }
    }

    pub fn in_range(&self) -> bool {
        self.value.is_finite() && self.value >= self.min && self.value <= self.max
    }
}

/// Тип CSG-операции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
}

impl BooleanOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Intersection => "intersection",
            BooleanOp::Difference => "difference",
        }
    }
}

/// Уровень сообщения в журнале
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// Формат файла сетки (определяется по расширению)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Stl,
    Ply,
    Vtk,
    Obj,
    Vtp,
}

impl FileFormat {
    pub fn all() -> &'static [FileFormat] {
        &[
            FileFormat::Stl,
            FileFormat::Ply,
            FileFormat::Vtk,
            FileFormat::Obj,
            FileFormat::Vtp,
        ]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Stl => "stl",
            FileFormat::Ply => "ply",
            FileFormat::Vtk => "vtk",
            FileFormat::Obj => "obj",
            FileFormat::Vtp => "vtp",
        }
    }

    /// Формат по расширению файла (без учёта регистра)
    pub fn from_path(path: &Path) -> Option<FileFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        FileFormat::all()
            .iter()
            .copied()
            .find(|f| f.extension() == ext)
    }
}

fn default_one() -> f64 {
    1.0
}

fn default_half() -> f64 {
    0.5
}

fn default_resolution() -> u32 {
    32
}

fn default_sides() -> u32 {
    4
}
