use serde::Deserialize;

/// Class index -> label mapping
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_transform() {
        let encoder = LabelEncoder {
            classes: vec!["Humectant".to_string(), "Preservative".to_string()],
        };
        assert_eq!(encoder.inverse_transform(1), Some("Preservative"));
        assert_eq!(encoder.inverse_transform(2), None);
    }
}
