//! Lenses over optional parents.

use super::Lens;
use crate::error::LensError;

impl<P: 'static, T: 'static> Lens<P, T> {
    /// Lift this lens onto an optional parent.
    ///
    /// Reading or writing through the lifted lens while the parent is `None`
    /// fails with [`LensError::Absent`].
    pub fn into_nullable(self) -> Lens<Option<P>, T> {
        let id = self.id().to_string();
        let get_lens = self.clone();
        let (get_id, set_id) = (id.clone(), id.clone());

        Lens::try_new(
            id,
            move |parent: &Option<P>| match parent {
                Some(p) => get_lens.get(p),
                None => Err(LensError::Absent { id: get_id.clone() }),
            },
            move |parent: Option<P>, value: T| match parent {
                Some(p) => self.set(p, value).map(Some),
                None => Err(LensError::Absent { id: set_id.clone() }),
            },
        )
    }
}

impl<T> Lens<Option<T>, T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Lens translating `None` to `default` on read, and `default` back to
    /// `None` on write.
    pub fn or_default(default: T) -> Self {
        let read_default = default.clone();
        Lens::new(
            "",
            move |parent: &Option<T>| parent.clone().unwrap_or_else(|| read_default.clone()),
            move |_, value: T| if value == default { None } else { Some(value) },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        nick: String,
    }

    fn nick() -> Lens<Profile, String> {
        Lens::new("nick", |p: &Profile| p.nick.clone(), |_, nick| Profile { nick })
    }

    #[test]
    fn nullable_lens_fails_on_absent_parent() {
        let lens = nick().into_nullable();
        assert_eq!(
            lens.get(&None),
            Err(LensError::Absent { id: "nick".to_string() })
        );
        assert!(lens.set(None, "x".to_string()).is_err());
    }

    #[test]
    fn nullable_lens_reads_present_parent() {
        let lens = nick().into_nullable();
        let parent = Some(Profile { nick: "n".to_string() });
        assert_eq!(lens.get(&parent).unwrap(), "n");
        let written = lens.set(parent, "m".to_string()).unwrap();
        assert_eq!(written, Some(Profile { nick: "m".to_string() }));
    }

    #[test]
    fn default_lens_maps_both_directions() {
        let lens = Lens::or_default(0);
        assert_eq!(lens.id(), "");
        assert_eq!(lens.get(&None).unwrap(), 0);
        assert_eq!(lens.get(&Some(4)).unwrap(), 4);
        assert_eq!(lens.set(Some(4), 0).unwrap(), None);
        assert_eq!(lens.set(None, 2).unwrap(), Some(2));
    }
}
