mod common;

use std::collections::HashMap;

use common::{count_lens, done_lens, label_lens, Counter, Todo};
use lensbound::Lens;
use proptest::prelude::*;
use proptest::sample::Index;

fn counter() -> impl Strategy<Value = Counter> {
    (any::<i32>(), "[a-z]{0,8}").prop_map(|(count, label)| Counter { count, label })
}

/// Todos with distinct ids.
fn todos() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::btree_map(0u32..1000, ("[a-z]{0,6}", any::<bool>()), 1..12).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(id, (text, done))| Todo { id, text, done })
                .collect()
        },
    )
}

fn check_laws<P, T>(lens: &Lens<P, T>, parent: P, value: T) -> Result<(), TestCaseError>
where
    P: Clone + PartialEq + std::fmt::Debug,
    T: Clone + PartialEq + std::fmt::Debug,
{
    let written = lens.set(parent.clone(), value.clone()).unwrap();
    prop_assert_eq!(lens.get(&written).unwrap(), value);

    let focus = lens.get(&parent).unwrap();
    prop_assert_eq!(lens.set(parent.clone(), focus).unwrap(), parent);
    Ok(())
}

proptest! {
    #[test]
    fn field_lenses_are_lawful(parent in counter(), count in any::<i32>(), label in "[a-z]{0,8}") {
        check_laws(&count_lens(), parent.clone(), count)?;
        check_laws(&label_lens(), parent, label)?;
    }

    #[test]
    fn index_lens_is_lawful(list in prop::collection::vec(any::<i64>(), 1..30), pick in any::<Index>(), value in any::<i64>()) {
        let lens = Lens::index(pick.index(list.len()));
        check_laws(&lens, list, value)?;
    }

    #[test]
    fn element_lens_is_lawful(list in todos(), pick in any::<Index>(), text in "[a-z]{0,6}", done in any::<bool>()) {
        let target = list[pick.index(list.len())].clone();
        let lens = Lens::element(&target, |t: &Todo| t.id);
        let value = Todo { id: target.id, text, done };
        check_laws(&lens, list, value)?;
    }

    #[test]
    fn element_lens_write_leaves_other_elements(list in todos(), pick in any::<Index>(), done in any::<bool>()) {
        let position = pick.index(list.len());
        let lens = Lens::element(&list[position], |t: &Todo| t.id);
        let value = Todo { done, ..list[position].clone() };

        let written = lens.set(list.clone(), value).unwrap();
        for (i, (before, after)) in list.iter().zip(&written).enumerate() {
            if i != position {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn key_lens_is_lawful(map in prop::collection::hash_map("[a-z]{1,4}", any::<i32>(), 1..10), pick in any::<Index>(), value in any::<i32>()) {
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        let lens = Lens::<HashMap<String, i32>, i32>::key(keys[pick.index(keys.len())].clone());
        check_laws(&lens, map, value)?;
    }

    #[test]
    fn composed_lens_is_lawful(list in todos(), pick in any::<Index>(), done in any::<bool>()) {
        let lens = Lens::index(pick.index(list.len())) + done_lens();
        check_laws(&lens, list, done)?;
    }

    #[test]
    fn nullable_lens_is_lawful_on_present_parent(parent in counter(), count in any::<i32>()) {
        check_laws(&count_lens().into_nullable(), Some(parent), count)?;
    }

    #[test]
    fn default_lens_is_lawful_off_the_default(value in proptest::option::of(1u16..), next in any::<u16>()) {
        // `Some(default)` is normalized to `None` on write, so it is excluded.
        check_laws(&Lens::or_default(0u16), value, next)?;
    }
}
