use anyhow::{Context, Result, anyhow, bail};
use fontdb::{Database, Style, Weight};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use ttf_parser::{Face, RawFace};

use super::content::compress_data;
use crate::error::ConfigError;

/// A standalone TrueType font program
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub name: String,
    pub data: Vec<u8>,
}

impl LoadedFont {
    /// Take face `index` out of `data`. Collections are unpacked into a
    /// single-face font; faces with CFF outlines are rejected since only
    /// `glyf` outlines can be embedded as FontFile2.
    pub fn new(name: &str, data: &[u8], index: u32) -> Result<Self> {
        let face = Face::parse(data, index)
            .with_context(|| format!("Failed to parse font '{}'", name))?;
        let tables = face.tables();
        if tables.cff.is_some() || tables.cff2.is_some() {
            bail!("Font '{}' has CFF outlines; only TrueType outlines are supported", name);
        }
        if tables.glyf.is_none() {
            bail!("Font '{}' has no TrueType outlines", name);
        }

        let data = if ttf_parser::fonts_in_collection(data).is_some() {
            extract_face(data, index)
                .with_context(|| format!("Failed to extract '{}' from font collection", name))?
        } else {
            data.to_vec()
        };

        Ok(Self {
            name: name.to_string(),
            data,
        })
    }

    /// Read a font file (the first face of a collection) and check that it parses
    pub fn from_file(name: &str, path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read font file: {:?}", path))?;
        Self::new(name, &data, 0)
            .with_context(|| format!("Failed to parse font file: {:?}", path))
    }

    pub fn face(&self) -> Result<Face<'_>> {
        Face::parse(&self.data, 0)
            .with_context(|| format!("Failed to parse font '{}'", self.name))
    }
}

/// Copy one face of a TrueType collection into a standalone font file
fn extract_face(data: &[u8], index: u32) -> Result<Vec<u8>> {
    let raw = RawFace::parse(data, index)?;
    let mut tables = Vec::new();
    for record in raw.table_records {
        let start = record.offset as usize;
        let end = start + record.length as usize;
        let table = data
            .get(start..end)
            .ok_or_else(|| anyhow!("Table {} lies outside the font data", record.tag))?;
        tables.push((record.tag.to_bytes(), record.check_sum, table));
    }
    Ok(write_sfnt(&tables, 0))
}

/// Lay out an sfnt with the given tables. Offsets are written relative to
/// `base_offset`, the position the sfnt will have in the final file.
fn write_sfnt(tables: &[([u8; 4], u32, &[u8])], base_offset: usize) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut entry_selector = 0u16;
    while (1u16 << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = base_offset + 12 + 16 * tables.len();
    for (tag, check_sum, table) in tables {
        out.extend_from_slice(tag);
        out.extend_from_slice(&check_sum.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(table.len() as u32).to_be_bytes());
        offset += table.len().next_multiple_of(4);
    }

    // tables are 4-byte aligned
    for (_, _, table) in tables {
        out.extend_from_slice(table);
        out.resize(out.len().next_multiple_of(4), 0);
    }
    out
}

/// Fonts known by id. Ids that were never registered are looked up by name
/// in the system font directories, which are only scanned on first use.
pub struct FontRegistry {
    fonts: HashMap<String, LoadedFont>,
    font_dirs: Vec<PathBuf>,
    db: Option<Database>,
}

impl FontRegistry {
    pub fn new(extra_dirs: &[PathBuf]) -> Self {
        Self {
            fonts: HashMap::new(),
            font_dirs: extra_dirs.to_vec(),
            db: None,
        }
    }

    pub fn register(&mut self, id: &str, path: &Path) -> Result<()> {
        let font = LoadedFont::from_file(id, path)?;
        debug!("Registered font '{}' from {:?}", id, path);
        self.fonts.insert(id.to_string(), font);
        Ok(())
    }

    /// Look up a font by id, falling back to the font database
    pub fn resolve(&mut self, id: &str) -> Result<&LoadedFont> {
        if !self.fonts.contains_key(id) {
            let db = self
                .db
                .get_or_insert_with(|| load_font_database(&self.font_dirs));
            let (data, index) = find_in_database(db, id)
                .ok_or_else(|| ConfigError::UnregisteredFont(id.to_string()))?;
            let font = LoadedFont::new(id, &data, index)?;
            info!("Using system font for '{}'", id);
            self.fonts.insert(id.to_string(), font);
        }

        self.fonts
            .get(id)
            .ok_or_else(|| ConfigError::UnregisteredFont(id.to_string()).into())
    }
}

/// Platform font directories plus any extra ones
fn load_font_database(extra_dirs: &[PathBuf]) -> Database {
    let mut db = Database::new();

    if cfg!(target_os = "macos") {
        db.load_system_fonts();
    } else if cfg!(target_os = "windows") {
        if std::env::var("WINDIR").is_ok() {
            db.load_fonts_dir(PathBuf::from("C:\\Windows\\Fonts"));
        }
    } else if cfg!(target_os = "linux") {
        for path in &["/usr/share/fonts", "/usr/local/share/fonts"] {
            db.load_fonts_dir(PathBuf::from(path));
        }
        // Load user fonts
        if let Ok(home) = std::env::var("HOME") {
            for subpath in &[".fonts", ".local/share/fonts"] {
                db.load_fonts_dir(PathBuf::from(&home).join(subpath));
            }
        }
    }

    for dir in extra_dirs {
        db.load_fonts_dir(dir);
    }

    debug!("Font database holds {} faces", db.len());
    db
}

/// Lowercase alphanumerics only, so "Noto Sans Bold" matches "NotoSans-Bold"
fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Match by PostScript name first, then by family name preferring the regular face.
/// Returns the file holding the face and the face index within it.
fn find_in_database(db: &Database, id: &str) -> Option<(Vec<u8>, u32)> {
    let wanted = normalize_font_name(id);

    let by_postscript = db
        .faces()
        .find(|face| normalize_font_name(&face.post_script_name) == wanted);
    let face = by_postscript.or_else(|| {
        let mut family_faces = db.faces().filter(|face| {
            face.families
                .iter()
                .any(|(family, _)| normalize_font_name(family) == wanted)
        });
        let first = family_faces.next()?;
        if first.weight == Weight::NORMAL && first.style == Style::Normal {
            return Some(first);
        }
        family_faces
            .find(|face| face.weight == Weight::NORMAL && face.style == Style::Normal)
            .or(Some(first))
    })?;

    db.with_face_data(face.id, |data, index| (data.to_vec(), index))
}

/// Scale a value in font units to PDF glyph space (1000 units per em)
fn to_glyph_space(value: f64, units_per_em: f64) -> i64 {
    (value * 1000.0 / units_per_em).round() as i64
}

/// Build a CIDToGIDMap stream from font's cmap table
///
/// Content streams use Unicode code points as CIDs (Identity-H), so each
/// CID needs mapping to the glyph that the cmap assigns to it.
fn build_cidtogid_map(face: &Face) -> Vec<u8> {
    const MAX_CID: u16 = 0xFFFF;
    let mut gid_map: Vec<u8> = Vec::with_capacity((MAX_CID as usize + 1) * 2);

    for cid in 0..=MAX_CID {
        // Surrogates and unmapped code points go to .notdef
        let gid = char::from_u32(cid as u32)
            .and_then(|ch| face.glyph_index(ch))
            .map(|g| g.0)
            .unwrap_or(0);
        gid_map.extend_from_slice(&gid.to_be_bytes());
    }

    gid_map
}

/// `/W` entries for every BMP character in `text`, as `cid [width]` pairs
fn build_widths(face: &Face, text: &str) -> Vec<Object> {
    let units_per_em = face.units_per_em() as f64;
    let widths: BTreeMap<u16, i64> = text
        .chars()
        .filter_map(|ch| u16::try_from(ch as u32).ok().map(|cid| (cid, ch)))
        .map(|(cid, ch)| {
            let gid = face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0));
            let advance = face.glyph_hor_advance(gid).unwrap_or_default() as f64;
            (cid, to_glyph_space(advance, units_per_em))
        })
        .collect();

    widths
        .into_iter()
        .flat_map(|(cid, width)| {
            [
                Object::Integer(cid as i64),
                Object::Array(vec![Object::Integer(width)]),
            ]
        })
        .collect()
}

/// Flate-compressed stream with the given dictionary entries
fn compressed_stream(mut dict: Dictionary, data: &[u8]) -> Result<Stream> {
    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, compress_data(data)?))
}

/// Embed a font as a Type0 font with a CIDFontType2 descendant
///
/// Only the characters of `text` get explicit widths; the font program
/// itself is embedded whole.
pub fn embed_cid_font(doc: &mut Document, font: &LoadedFont, text: &str) -> Result<ObjectId> {
    let face = font.face()?;
    let units_per_em = face.units_per_em() as f64;
    let scale = |v: i16| to_glyph_space(v as f64, units_per_em);

    // PDF names can't carry spaces
    let base_font = font.name.replace(' ', "-");

    let bbox = face.global_bounding_box();
    let mut font_descriptor = Dictionary::new();
    font_descriptor.set("Type", "FontDescriptor");
    font_descriptor.set("FontName", base_font.as_str());
    font_descriptor.set("Flags", 4i64); // Symbolic
    font_descriptor.set(
        "FontBBox",
        [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
            .into_iter()
            .map(|v| Object::Integer(scale(v)))
            .collect::<Vec<_>>(),
    );
    font_descriptor.set("ItalicAngle", 0i64);
    font_descriptor.set("Ascent", scale(face.ascender()));
    font_descriptor.set("Descent", scale(face.descender()));
    font_descriptor.set(
        "CapHeight",
        scale(face.capital_height().unwrap_or(face.ascender())),
    );
    font_descriptor.set("StemV", 80i64);

    // Embed the font program
    let mut font_stream_dict = Dictionary::new();
    font_stream_dict.set("Length1", font.data.len() as i64);
    let font_stream_id = doc.add_object(compressed_stream(font_stream_dict, &font.data)?);
    font_descriptor.set("FontFile2", Object::Reference(font_stream_id));

    let descriptor_id = doc.add_object(Object::Dictionary(font_descriptor));

    let cidtogid_id = doc.add_object(compressed_stream(
        Dictionary::new(),
        &build_cidtogid_map(&face),
    )?);

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", "Font");
    cid_font.set("Subtype", "CIDFontType2");
    cid_font.set("BaseFont", base_font.as_str());
    cid_font.set("CIDSystemInfo", {
        let mut cid_system = Dictionary::new();
        cid_system.set("Registry", Object::String("Adobe".into(), StringFormat::Literal));
        cid_system.set("Ordering", Object::String("Identity".into(), StringFormat::Literal));
        cid_system.set("Supplement", 0i64);
        Object::Dictionary(cid_system)
    });
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("CIDToGIDMap", Object::Reference(cidtogid_id));
    cid_font.set("DW", 1000i64);
    cid_font.set("W", build_widths(&face, text));

    let cid_font_id = doc.add_object(Object::Dictionary(cid_font));

    let mut type0_font = Dictionary::new();
    type0_font.set("Type", "Font");
    type0_font.set("Subtype", "Type0");
    type0_font.set("BaseFont", base_font.as_str());
    type0_font.set("Encoding", "Identity-H");
    type0_font.set("DescendantFonts", vec![Object::Reference(cid_font_id)]);

    Ok(doc.add_object(Object::Dictionary(type0_font)))
}
