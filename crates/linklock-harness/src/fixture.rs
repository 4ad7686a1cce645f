//! Canned document content for selection tests.

use linklock_app::Document;

/// The demo study-card document shipped on the reference sender: three
/// paragraphs, each a question line followed by an answer line.
pub fn sample_document() -> Document {
    Document::new(vec![
        vec![
            "What is the derivative of 2x^3 + 3x?".to_string(),
            "The derivative is 6x^2 + 3.".to_string(),
        ],
        vec![
            "What is the moment of inertia of a rolling disk?".to_string(),
            "I = 1/2MR^2.".to_string(),
        ],
        vec![
            "When the determinant does not equal to 0, is the matrix invertible?".to_string(),
            "The matrix is indeed invertible if the det(A) != 0.".to_string(),
        ],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_shape() {
        let doc = sample_document();
        assert_eq!(doc.paragraph_count(), 3);
        for paragraph in 0..3 {
            assert_eq!(doc.line_count(paragraph), Some(2));
        }
    }
}
