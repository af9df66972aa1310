//! Brush asset store
//!
//! Every ink stroke in the garden is a pre-rendered stamp: soft radial
//! washes for petals and glows, rough stippled blobs for branch strokes.
//! The stamps are baked once at startup ([`bake`]) and referenced by
//! [`BrushKind`] from then on, so drawing never re-renders a texture.

mod bake;

pub use bake::BrushSet;

/// Identifies one pre-baked stamp texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushKind {
    /// Soft dark wash for stem tips
    SoftBlack,
    /// Soft red wash for petals and the press glow
    SoftRed,
    /// Saturated rough blob for wet branch strokes
    WetBlack,
    /// Sparse rough blob for dry branch tips
    DryBlack,
    /// Rough deep-red blob for flower clusters
    RedPlum,
    /// Rough pale-red blob for flower clusters
    PalePlum,
    /// Very faint red wash for the shockwave particles
    Ripple,
    /// Faint dark wash under stems and trunks
    Root,
}

impl BrushKind {
    pub const ALL: [BrushKind; 8] = [
        BrushKind::SoftBlack,
        BrushKind::SoftRed,
        BrushKind::WetBlack,
        BrushKind::DryBlack,
        BrushKind::RedPlum,
        BrushKind::PalePlum,
        BrushKind::Ripple,
        BrushKind::Root,
    ];

    pub fn index(self) -> usize {
        match self {
            BrushKind::SoftBlack => 0,
            BrushKind::SoftRed => 1,
            BrushKind::WetBlack => 2,
            BrushKind::DryBlack => 3,
            BrushKind::RedPlum => 4,
            BrushKind::PalePlum => 5,
            BrushKind::Ripple => 6,
            BrushKind::Root => 7,
        }
    }
}

/// Texture family of a brush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushTexture {
    /// Radial gradient fading from the base color to transparent
    Soft,
    /// Irregular filled blob with grains punched out; `dry` triples the
    /// grain count and widens the grains
    Rough { dry: bool },
}

/// Raster recipe for one brush stamp
#[derive(Debug, Clone, Copy)]
pub struct BrushSpec {
    pub texture: BrushTexture,
    /// Square canvas edge in pixels
    pub size: u32,
    pub rgb: (u8, u8, u8),
    pub alpha: f32,
}

impl BrushSpec {
    /// Grains punched out of a rough blob
    pub fn grain_count(&self) -> u32 {
        match self.texture {
            BrushTexture::Soft => 0,
            BrushTexture::Rough { dry: false } => 400,
            BrushTexture::Rough { dry: true } => 1200,
        }
    }

    /// Maximum grain radius in pixels
    pub fn grain_radius(&self) -> f32 {
        match self.texture {
            BrushTexture::Soft => 0.0,
            BrushTexture::Rough { dry: false } => 2.5,
            BrushTexture::Rough { dry: true } => 4.0,
        }
    }
}

/// Raster recipe for a brush kind
pub fn spec(kind: BrushKind) -> BrushSpec {
    match kind {
        BrushKind::SoftBlack => BrushSpec {
            texture: BrushTexture::Soft,
            size: 64,
            rgb: (0, 0, 0),
            alpha: 0.8,
        },
        BrushKind::SoftRed => BrushSpec {
            texture: BrushTexture::Soft,
            size: 64,
            rgb: (180, 40, 50),
            alpha: 0.6,
        },
        BrushKind::WetBlack => BrushSpec {
            texture: BrushTexture::Rough { dry: false },
            size: 128,
            rgb: (10, 10, 10),
            alpha: 0.9,
        },
        BrushKind::DryBlack => BrushSpec {
            texture: BrushTexture::Rough { dry: true },
            size: 128,
            rgb: (20, 20, 20),
            alpha: 0.6,
        },
        BrushKind::RedPlum => BrushSpec {
            texture: BrushTexture::Rough { dry: false },
            size: 128,
            rgb: (200, 40, 60),
            alpha: 0.7,
        },
        BrushKind::PalePlum => BrushSpec {
            texture: BrushTexture::Rough { dry: false },
            size: 128,
            rgb: (220, 80, 90),
            alpha: 0.5,
        },
        BrushKind::Ripple => BrushSpec {
            texture: BrushTexture::Soft,
            size: 64,
            rgb: (160, 50, 60),
            alpha: 0.15,
        },
        BrushKind::Root => BrushSpec {
            texture: BrushTexture::Soft,
            size: 64,
            rgb: (10, 10, 10),
            alpha: 0.3,
        },
    }
}
