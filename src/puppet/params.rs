use super::container::Param;

/// Current value of every puppet parameter, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ParamValues {
    entries: Vec<(String, [f32; 2])>,
}

impl ParamValues {
    pub fn new(params: &[Param]) -> Self {
        let mut entries: Vec<_> = params
            .iter()
            .map(|param| (param.name.clone(), param.defaults))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// Unknown names are ignored; returns whether a parameter was updated.
    pub fn set(&mut self, name: &str, value: [f32; 2]) -> bool {
        match self.entries.binary_search_by(|(n, _)| n.as_str().cmp(name)) {
            Ok(i) => {
                self.entries[i].1 = value;
                true
            }
            Err(_) => false,
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<[f32; 2]> {
        self.entries
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, [f32; 2])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, defaults: [f32; 2]) -> Param {
        Param {
            name: name.to_string(),
            defaults,
        }
    }

    #[test]
    fn starts_from_defaults_and_updates_known_names() {
        let mut values = ParamValues::new(&[
            param("Eye:: Left:: XY", [0.5, 0.5]),
            param("Breathe", [0.0, 0.0]),
        ]);
        assert_eq!(values.get("Eye:: Left:: XY"), Some([0.5, 0.5]));

        assert!(values.set("Eye:: Left:: XY", [0.1, 0.9]));
        assert!(!values.set("Mouth:: Shape", [1.0, 0.0]));

        assert_eq!(values.get("Eye:: Left:: XY"), Some([0.1, 0.9]));
        assert_eq!(values.get("Mouth:: Shape"), None);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn iterates_in_name_order() {
        let values = ParamValues::new(&[param("b", [0.0; 2]), param("a", [0.0; 2])]);
        let names: Vec<_> = values.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
