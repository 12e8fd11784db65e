//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for span extraction, isolating the
//! concrete PDF library (lopdf) from the fragment analysis logic.

use crate::error::{Error, Result};
use crate::model::RawPage;

/// Abstract interface for producing raw page geometry.
///
/// Implementations own document access entirely; the analyzer only ever
/// sees the page → block → line → span shape they report.
pub trait PdfBackend {
    /// Extract all pages in document order.
    fn extract_pages(&self) -> Result<Vec<RawPage>>;
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    // Try UTF-8
    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: the bundled implementation on top of lopdf
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::extract::content::extract_page;

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self { doc })
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Get the combined (decompressed) content stream bytes for a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        // A page without a content stream is a valid empty page
        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            match s.decompressed_content() {
                                Ok(data) => {
                                    content.extend_from_slice(&data);
                                    content.push(b' ');
                                }
                                Err(e) => {
                                    log::warn!("Skipping unreadable content stream {:?}: {}", r, e)
                                }
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Resolve an object that may be a reference to a dictionary.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Names of image XObjects reachable from the page's resources.
    ///
    /// `Do` operations on these names become line-less blocks.
    fn page_image_xobjects(&self, page_id: ObjectId) -> HashSet<Vec<u8>> {
        let mut images = HashSet::new();

        let page_dict = match self.doc.get_dictionary(page_id) {
            Ok(dict) => dict,
            Err(_) => return images,
        };
        let xobjects = page_dict
            .get(b"Resources")
            .ok()
            .and_then(|obj| self.resolve_dict(obj))
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|obj| self.resolve_dict(obj));

        if let Some(xobjects) = xobjects {
            for (name, entry) in xobjects.iter() {
                let subtype = match entry {
                    Object::Reference(id) => match self.doc.get_object(*id) {
                        Ok(Object::Stream(s)) => {
                            s.dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok())
                        }
                        _ => None,
                    },
                    Object::Stream(s) => {
                        s.dict.get(b"Subtype").ok().and_then(|o| o.as_name().ok())
                    }
                    _ => None,
                };
                if subtype == Some(b"Image".as_slice()) {
                    images.insert(name.clone());
                }
            }
        }

        images
    }
}

impl PdfBackend for LopdfBackend {
    fn extract_pages(&self) -> Result<Vec<RawPage>> {
        if self.doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let mut pages = Vec::new();
        for (page_num, page_id) in self.doc.get_pages() {
            let fonts = self
                .doc
                .get_page_fonts(page_id)
                .map_err(|e| Error::PdfParse(e.to_string()))?;
            let content = self.page_content(page_id)?;
            let images = self.page_image_xobjects(page_id);

            let page = extract_page(&self.doc, &content, &fonts, &images)?;
            log::debug!("Page {}: {} blocks", page_num, page.blocks.len());
            pages.push(page);
        }
        Ok(pages)
    }
}
