//! Lenses into lists and maps.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use super::Lens;
use crate::error::LensError;

impl<D: Clone + Send + Sync + 'static> Lens<Vec<D>, D> {
    /// Focus the list element that has the same key as `element`.
    ///
    /// The key comes from `id_provider`, so the lens keeps pointing at the
    /// same logical entity when the list is reordered or filtered.
    pub fn element<I, F>(element: &D, id_provider: F) -> Self
    where
        I: PartialEq + Display + Send + Sync + 'static,
        F: Fn(&D) -> I + Send + Sync + 'static,
    {
        let key = Arc::new(id_provider(element));
        let id = key.to_string();
        let provider = Arc::new(id_provider);

        let (get_key, get_provider, get_id) = (Arc::clone(&key), Arc::clone(&provider), id.clone());
        let set_id = id.clone();

        Lens::try_new(
            id,
            move |list: &Vec<D>| {
                list.iter()
                    .find(|item| get_provider(item) == *get_key)
                    .cloned()
                    .ok_or_else(|| LensError::ElementNotFound { id: get_id.clone() })
            },
            move |mut list: Vec<D>, value: D| {
                let position = list
                    .iter()
                    .position(|item| provider(item) == *key)
                    .ok_or_else(|| LensError::ElementNotFound { id: set_id.clone() })?;
                list[position] = value;
                Ok(list)
            },
        )
    }

    /// Focus the element at a fixed position.
    ///
    /// Inserting, removing or moving elements shifts what this lens sees.
    /// Use [`Lens::element`] when the list itself is edited.
    pub fn index(index: usize) -> Self {
        Lens::try_new(
            index.to_string(),
            move |list: &Vec<D>| {
                list.get(index).cloned().ok_or(LensError::IndexOutOfBounds {
                    index,
                    len: list.len(),
                })
            },
            move |mut list: Vec<D>, value: D| {
                let len = list.len();
                let slot = list
                    .get_mut(index)
                    .ok_or(LensError::IndexOutOfBounds { index, len })?;
                *slot = value;
                Ok(list)
            },
        )
    }
}

impl<K, V> Lens<HashMap<K, V>, V>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Focus the value stored under `key`. Writing inserts the key if missing.
    pub fn key(key: K) -> Self {
        let get_key = key.clone();
        Lens::try_new(
            key.to_string(),
            move |map: &HashMap<K, V>| {
                map.get(&get_key).cloned().ok_or_else(|| LensError::KeyNotFound {
                    key: get_key.to_string(),
                })
            },
            move |mut map: HashMap<K, V>, value: V| {
                map.insert(key.clone(), value);
                Ok(map)
            },
        )
    }
}
