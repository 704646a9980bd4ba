use std::fs;
use std::path::Path;

use ab_glyph::FontArc;
use fruit_catcher_game::SpriteClass;
use image::{ImageReader, RgbaImage};
use log::info;

use crate::error::AssetError;

pub const BACKGROUND_FILE: &str = "background.jpg";
pub const BASKET_FILE: &str = "basket.png";
/// TrueType or OpenType font for the overlay text.
pub const FONT_FILE: &str = "font.ttf";

/// Decoded images and the overlay font for the game window.
#[derive(Debug, Clone)]
pub struct AssetStore {
    pub background: RgbaImage,
    pub basket: RgbaImage,
    pub font: FontArc,
    fruit: Vec<RgbaImage>,
}

impl AssetStore {
    /// Load every asset from `dir`. Any missing or unreadable file fails the
    /// whole load.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let background = load_rgba(&dir.join(BACKGROUND_FILE))?;
        let basket = load_rgba(&dir.join(BASKET_FILE))?;
        let fruit = SpriteClass::ALL
            .iter()
            .map(|class| load_rgba(&dir.join(class.asset_file())))
            .collect::<Result<Vec<_>, _>>()?;
        let font = load_font(&dir.join(FONT_FILE))?;
        info!("loaded {} assets from {}", fruit.len() + 3, dir.display());
        Ok(Self {
            background,
            basket,
            font,
            fruit,
        })
    }

    pub fn sprite(&self, class: SpriteClass) -> &RgbaImage {
        &self.fruit[class.index()]
    }

    /// Every file name the store expects, in load order.
    pub fn required_files() -> impl Iterator<Item = &'static str> {
        [BACKGROUND_FILE, BASKET_FILE]
            .into_iter()
            .chain(SpriteClass::ALL.iter().map(|c| c.asset_file()))
            .chain([FONT_FILE])
    }
}

fn load_font(path: &Path) -> Result<FontArc, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing { path: path.to_path_buf() });
    }
    let bytes = fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|source| AssetError::Font {
        path: path.to_path_buf(),
        source,
    })
}

fn load_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing { path: path.to_path_buf() });
    }
    let reader = ImageReader::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let img = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    pub(crate) const TEST_FONT: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/DejaVuSansMono.ttf");

    pub(crate) fn write_assets(dir: &Path) {
        for name in AssetStore::required_files() {
            let path = dir.join(name);
            if name == FONT_FILE {
                fs::copy(TEST_FONT, &path).unwrap();
            } else if name.ends_with(".jpg") {
                RgbImage::from_pixel(8, 8, Rgb([30, 90, 30])).save(&path).unwrap();
            } else {
                RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 255]))
                    .save(&path)
                    .unwrap();
            }
        }
    }

    #[test]
    fn loads_complete_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        let store = AssetStore::load(dir.path()).unwrap();
        assert_eq!(store.background.dimensions(), (8, 8));
        assert_eq!(store.sprite(SpriteClass::Grape).dimensions(), (8, 8));
        assert_eq!(AssetStore::required_files().count(), 11);
    }

    #[test]
    fn missing_font_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        fs::remove_file(dir.path().join(FONT_FILE)).unwrap();
        match AssetStore::load(dir.path()) {
            Err(AssetError::Missing { path }) => assert!(path.ends_with(FONT_FILE)),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn garbage_font_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        fs::write(dir.path().join(FONT_FILE), b"not a font").unwrap();
        assert!(matches!(
            AssetStore::load(dir.path()),
            Err(AssetError::Font { .. })
        ));
    }

    #[test]
    fn missing_sprite_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        fs::remove_file(dir.path().join("banana.png")).unwrap();
        match AssetStore::load(dir.path()) {
            Err(AssetError::Missing { path }) => assert!(path.ends_with("banana.png")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn corrupt_asset_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        fs::write(dir.path().join(BASKET_FILE), b"garbage").unwrap();
        assert!(matches!(
            AssetStore::load(dir.path()),
            Err(AssetError::Decode { .. })
        ));
    }
}
