mod common;

use common::{count_lens, done_lens, Counter, Todo};
use lensbound::{Lens, ListStoreExt, ModelId, ModelIdRoot, RootStore, Store, StoreExt};

#[test]
fn sub_ids_are_dotted_paths() {
    let root = ModelIdRoot::<Counter>::new("counter");
    assert_eq!(root.id(), "counter");
    assert_eq!(root.sub(&count_lens()).id(), "counter.count");
}

#[test]
fn default_root_has_empty_id() {
    let root = ModelIdRoot::<Vec<Todo>>::default();
    let done = root.sub(&Lens::index(2)).sub(&done_lens());
    assert_eq!(done.id(), "2.done");
}

#[tokio::test]
async fn ids_match_the_store_hierarchy() {
    let store = RootStore::with_id(Vec::<Todo>::new(), "todos");
    let ids = ModelIdRoot::<Vec<Todo>>::new("todos");

    let store_id = store.sub_index(0).sub(done_lens()).id().to_string();
    let model_id = ids.sub(&Lens::index(0)).sub(&done_lens()).id().to_string();
    assert_eq!(store_id, model_id);
}
