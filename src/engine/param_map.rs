/// Named parameter values handed to [`super::Renderer::animate`]. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, [f32; 2])>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value if `name` is already present.
    pub fn insert(&mut self, name: &str, value: [f32; 2]) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<[f32; 2]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, [f32; 2])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
