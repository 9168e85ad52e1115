use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;
use tracing::info;

use super::content::{ContentBuilder, compress_data};
use super::fonts::{LoadedFont, embed_cid_font};
use super::resources::{FONT_RESOURCE, page_resources};
use crate::compose::ComposedPage;

/// Render a composed page into a single-page PDF with `font` embedded
pub fn render(page: &ComposedPage, font: &LoadedFont) -> Result<Document> {
    info!("Rendering {} page at {} pt", page.media, page.fit.font_size);
    let mut doc = Document::with_version("1.5");

    let text: String = page
        .fit
        .block
        .lines
        .iter()
        .map(|line| line.text.as_str())
        .collect();
    let font_id = embed_cid_font(&mut doc, font, &text)
        .with_context(|| format!("Failed to embed font '{}'", font.name))?;

    assemble(&mut doc, page, font_id)?;
    Ok(doc)
}

/// Add the page tree, the single page and the catalog to `doc`
fn assemble(doc: &mut Document, page: &ComposedPage, font_id: ObjectId) -> Result<()> {
    let pages_id = doc.new_object_id();

    // Build content for the page
    let mut builder = ContentBuilder::new(FONT_RESOURCE);
    builder.add_page(page);

    let mut content_dict = Dictionary::new();
    content_dict.set("Filter", "FlateDecode");
    let content = Stream::new(content_dict, compress_data(&builder.build_content_bytes())?);
    let content_id = doc.add_object(content);

    // Declare the nominal page size; label margins absorb the difference
    let media_box: Vec<Object> = [0.0, 0.0, page.geometry.page_width, page.geometry.page_height]
        .into_iter()
        .map(|v| Object::Real(v as f32))
        .collect();

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", "Page");
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set("MediaBox", media_box);
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(page_resources(font_id)));
    let page_id = doc.add_object(Object::Dictionary(page_dict));

    let mut pages = Dictionary::new();
    pages.set("Type", "Pages");
    pages.set("Kids", vec![Object::Reference(page_id)]);
    pages.set("Count", 1i64);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", "Catalog");
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(())
}

/// Write the document to `path`, replacing whatever is there
pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
    doc.save(path)
        .with_context(|| format!("Failed to write PDF to {:?}", path))?;
    info!("Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::layout::wrap::tests::Monospace;
    use crate::media::MediaProfile;

    /// Standard Type1 font, so tests don't need a font file
    fn helvetica(doc: &mut Document) -> ObjectId {
        let mut font_dict = Dictionary::new();
        font_dict.set("Type", "Font");
        font_dict.set("Subtype", "Type1");
        font_dict.set("BaseFont", "Helvetica");
        doc.add_object(Object::Dictionary(font_dict))
    }

    fn build(media: MediaProfile, text: &str) -> Document {
        let page = compose(media, text, &Monospace);
        let mut doc = Document::with_version("1.5");
        let font_id = helvetica(&mut doc);
        assemble(&mut doc, &page, font_id).unwrap();
        doc
    }

    #[test]
    fn test_single_page_with_nominal_media_box() {
        let doc = build(MediaProfile::Label1, "Hi");
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((height - (110.0 * 72.0 / 25.4) as f32).abs() < 0.01);
    }

    #[test]
    fn test_saved_file_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.pdf");

        let mut doc = build(MediaProfile::Note, "Buy milk");
        save(&mut doc, &path).unwrap();

        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn test_render_with_embedded_font_reloads() {
        let Some(font) = crate::pdf::fonts::tests::system_font() else { return };
        let metrics = crate::layout::FontMetrics::new(font.face().unwrap());
        let page = compose(MediaProfile::Label2, "Call the plumber", &metrics);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.pdf");
        let mut doc = render(&page, &font).unwrap();
        save(&mut doc, &path).unwrap();

        let reloaded = Document::load(&path).unwrap();
        let pages = reloaded.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page_dict = reloaded.get_dictionary(page_id).unwrap();
        let resources = page_dict.get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        let font_id = fonts.get(FONT_RESOURCE.as_bytes()).unwrap().as_reference().unwrap();
        let type0 = reloaded.get_dictionary(font_id).unwrap();
        assert_eq!(type0.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut first = build(MediaProfile::Note, "Buy milk");
        let mut second = build(MediaProfile::Note, "Buy milk");

        let mut a = Vec::new();
        let mut b = Vec::new();
        first.save_to(&mut a).unwrap();
        second.save_to(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
