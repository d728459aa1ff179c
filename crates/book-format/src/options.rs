use crate::catalog::SupportedSize;
use crate::constants::{PAGES_PER_INCH, SPINE_ALLOWANCE_IN};
use crate::types::*;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Binding methods offered by the publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Binding {
    /// Paperback with a glued spine
    #[default]
    PerfectBound,
    /// Plastic coil through punched holes, no spine
    CoilBound,
    /// Folded sheets stapled through the fold, no spine
    SaddleStitch,
    /// Hardcover with the printed cover wrapped around the boards
    CaseWrap,
    /// Hardcover wrapped in linen, printed dust jacket
    LinenWrap,
}

impl Binding {
    /// Two-letter code used in the POD package id
    pub fn code(self) -> &'static str {
        match self {
            Binding::PerfectBound => "PB",
            Binding::CoilBound => "CO",
            Binding::SaddleStitch => "SS",
            Binding::CaseWrap => "CW",
            Binding::LinenWrap => "LW",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Binding::PerfectBound => "Perfect bound",
            Binding::CoilBound => "Coil bound",
            Binding::SaddleStitch => "Saddle stitch",
            Binding::CaseWrap => "Case wrap",
            Binding::LinenWrap => "Linen wrap",
        }
    }

    /// Interior page counts the binding can hold
    pub fn page_range(self) -> RangeInclusive<usize> {
        match self {
            Binding::PerfectBound => 32..=800,
            Binding::CoilBound => 2..=470,
            Binding::SaddleStitch => 4..=48,
            Binding::CaseWrap | Binding::LinenWrap => 24..=800,
        }
    }

    /// Whether the cover wraps around a spine
    pub fn has_spine(self) -> bool {
        !matches!(self, Binding::CoilBound | Binding::SaddleStitch)
    }

    /// Spine width in inches for `page_count` interior pages
    pub fn spine_width_in(self, page_count: usize) -> f32 {
        if self.has_spine() {
            page_count as f32 / PAGES_PER_INCH + SPINE_ALLOWANCE_IN
        } else {
            0.0
        }
    }

    pub fn check_page_count(self, pages: usize) -> Result<()> {
        let range = self.page_range();
        if range.contains(&pages) {
            Ok(())
        } else {
            Err(FormatError::PageCount {
                binding: self,
                pages,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Binding {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perfect" | "perfect-bound" | "pb" => Ok(Binding::PerfectBound),
            "coil" | "coil-bound" | "co" => Ok(Binding::CoilBound),
            "saddle" | "saddle-stitch" | "ss" => Ok(Binding::SaddleStitch),
            "case" | "case-wrap" | "cw" => Ok(Binding::CaseWrap),
            "linen" | "linen-wrap" | "lw" => Ok(Binding::LinenWrap),
            _ => Err(FormatError::UnknownOption {
                kind: "binding",
                value: s.to_string(),
            }),
        }
    }
}

/// Interior ink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteriorColor {
    #[default]
    BlackAndWhite,
    FullColor,
}

impl InteriorColor {
    pub fn code(self) -> &'static str {
        match self {
            InteriorColor::BlackAndWhite => "BW",
            InteriorColor::FullColor => "FC",
        }
    }
}

impl FromStr for InteriorColor {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bw" | "black-and-white" | "mono" => Ok(InteriorColor::BlackAndWhite),
            "fc" | "full" | "full-color" | "color" => Ok(InteriorColor::FullColor),
            _ => Err(FormatError::UnknownOption {
                kind: "interior color",
                value: s.to_string(),
            }),
        }
    }
}

/// Interior paper stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperType {
    /// 60# uncoated white
    #[default]
    Uncoated60,
    /// 80# coated white
    Coated80,
}

impl PaperType {
    pub fn code(self) -> &'static str {
        match self {
            PaperType::Uncoated60 => "060UW444",
            PaperType::Coated80 => "080CW444",
        }
    }
}

impl FromStr for PaperType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uncoated" | "060uw444" => Ok(PaperType::Uncoated60),
            "coated" | "080cw444" => Ok(PaperType::Coated80),
            _ => Err(FormatError::UnknownOption {
                kind: "paper",
                value: s.to_string(),
            }),
        }
    }
}

/// Cover lamination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverFinish {
    #[default]
    Matte,
    Gloss,
}

impl CoverFinish {
    pub fn code(self) -> &'static str {
        match self {
            CoverFinish::Matte => "M",
            CoverFinish::Gloss => "G",
        }
    }
}

impl FromStr for CoverFinish {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matte" | "m" => Ok(CoverFinish::Matte),
            "gloss" | "glossy" | "g" => Ok(CoverFinish::Gloss),
            _ => Err(FormatError::UnknownOption {
                kind: "cover finish",
                value: s.to_string(),
            }),
        }
    }
}

/// Everything about the printed product other than its trim size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrintOptions {
    pub binding: Binding,
    pub color: InteriorColor,
    pub paper: PaperType,
    pub finish: CoverFinish,
}

impl PrintOptions {
    /// Product code for `size` with these options, e.g. `0600X0900BWSTDPB060UW444MXX`.
    ///
    /// Layout: trim size, colour, quality (always standard), binding, paper,
    /// finish, then `XX` for no linen colour and no foil.
    pub fn pod_package_id(&self, size: &SupportedSize) -> String {
        format!(
            "{}{}STD{}{}{}XX",
            size.code,
            self.color.code(),
            self.binding.code(),
            self.paper.code(),
            self.finish.code()
        )
    }
}
