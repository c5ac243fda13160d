//! Open/closed state for the menu entries, independent of the page.

/// A single state change to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub index: usize,
    pub open: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Accordion {
    open: Vec<bool>,
    single_open: bool,
}

impl Accordion {
    pub fn new(initial: impl IntoIterator<Item = bool>, single_open: bool) -> Self {
        Self { open: initial.into_iter().collect(), single_open }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|o| **o).count()
    }

    /// Flip entry `index`. Under the single-open policy opening one entry closes
    /// the others first. Returns the changes in the order they should be applied;
    /// the toggled entry is always last.
    pub fn toggle(&mut self, index: usize) -> Vec<Transition> {
        let Some(&current) = self.open.get(index) else {
            return Vec::new();
        };
        let will_open = !current;
        let mut changes = Vec::new();
        if self.single_open && will_open {
            for (i, open) in self.open.iter_mut().enumerate() {
                if i != index && *open {
                    *open = false;
                    changes.push(Transition { index: i, open: false });
                }
            }
        }
        self.open[index] = will_open;
        changes.push(Transition { index, open: will_open });
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_b_closes_a_under_single_open() {
        let mut acc = Accordion::new([true, false, false], true);
        let changes = acc.toggle(1);
        assert_eq!(
            changes,
            vec![Transition { index: 0, open: false }, Transition { index: 1, open: true }]
        );
        assert!(!acc.is_open(0));
        assert!(acc.is_open(1));
        assert_eq!(acc.open_count(), 1);
    }

    #[test]
    fn closing_leaves_others_alone() {
        let mut acc = Accordion::new([false, true], true);
        assert_eq!(acc.toggle(1), vec![Transition { index: 1, open: false }]);
        assert_eq!(acc.open_count(), 0);
    }

    #[test]
    fn multi_open_when_policy_off() {
        let mut acc = Accordion::new([false; 3], false);
        acc.toggle(0);
        acc.toggle(2);
        assert_eq!(acc.open_count(), 2);
    }

    #[test]
    fn single_open_repairs_markup_with_several_open() {
        let mut acc = Accordion::new([true, true, false], true);
        acc.toggle(2);
        assert_eq!(acc.open_count(), 1);
        assert!(acc.is_open(2));
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut acc = Accordion::new([false], true);
        assert!(acc.toggle(5).is_empty());
        assert!(!acc.is_open(5));
    }
}
