/// A requested name and whether an entry has claimed it
#[derive(Debug, Clone)]
struct Request {
    name: String,
    consumed: bool,
}

/// Matches entry names against the request list.
///
/// Each request is claimed by at most one entry, so a name requested twice
/// selects the first two entries carrying it. An empty list selects all.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    requests: Vec<Request>,
}

impl Selector {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requests: names
                .into_iter()
                .map(|name| Request {
                    name: name.into(),
                    consumed: false,
                })
                .collect(),
        }
    }

    /// Whether every entry is selected
    pub fn selects_all(&self) -> bool {
        self.requests.is_empty()
    }

    /// Claim the first unconsumed request equal to the raw member name
    pub fn matches(&mut self, name: &[u8]) -> bool {
        if self.selects_all() {
            return true;
        }

        match self
            .requests
            .iter_mut()
            .find(|r| !r.consumed && r.name.as_bytes() == name)
        {
            Some(request) => {
                request.consumed = true;
                true
            }
            None => false,
        }
    }

    /// Requests never claimed, in the order given
    pub fn missing(&self) -> Vec<String> {
        self.requests
            .iter()
            .filter(|r| !r.consumed)
            .map(|r| r.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_selects_everything() {
        let mut selector = Selector::new(Vec::<String>::new());
        assert!(selector.selects_all());
        assert!(selector.matches(b"anything"));
        assert!(selector.matches(b"anything"));
        assert!(selector.missing().is_empty());
    }

    #[test]
    fn requests_are_consumed_once() {
        let mut selector = Selector::new(["a", "b"]);
        assert!(selector.matches(b"a"));
        assert!(!selector.matches(b"a"));
        assert!(!selector.matches(b"c"));
        assert_eq!(selector.missing(), ["b"]);
    }

    #[test]
    fn duplicates_match_one_for_one() {
        let mut selector = Selector::new(["a", "x", "a"]);
        assert!(selector.matches(b"a"));
        assert!(selector.matches(b"a"));
        assert!(!selector.matches(b"a"));
        assert_eq!(selector.missing(), ["x"]);
    }

    #[test]
    fn names_compare_as_bytes() {
        let mut selector = Selector::new(["caf\u{e9}.txt"]);
        assert!(!selector.matches(b"caf\xe9.txt"));
        assert!(!selector.matches("caf\u{fffd}.txt".as_bytes()));
        assert!(selector.matches("caf\u{e9}.txt".as_bytes()));
    }

    #[test]
    fn missing_keeps_original_order() {
        let mut selector = Selector::new(["z", "m", "a", "m"]);
        assert!(selector.matches(b"m"));
        assert_eq!(selector.missing(), ["z", "a", "m"]);
    }
}
