use lopdf::{Dictionary, Object, ObjectId};

/// Resource name the content stream uses for the note font
pub const FONT_RESOURCE: &str = "F1";

/// Resources dictionary for the note page: one font under [`FONT_RESOURCE`]
pub fn page_resources(font_id: ObjectId) -> Dictionary {
    let mut font_resources = Dictionary::new();
    font_resources.set(FONT_RESOURCE, Object::Reference(font_id));

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(font_resources));
    resources.set(
        "ProcSet",
        vec![Object::Name(b"PDF".to_vec()), Object::Name(b"Text".to_vec())],
    );
    resources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_resources_reference_font() {
        let resources = page_resources((7, 0));
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert_eq!(
            fonts.get(FONT_RESOURCE.as_bytes()).unwrap().as_reference().unwrap(),
            (7, 0)
        );
    }
}
