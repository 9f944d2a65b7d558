use futures::future;
use futures::stream::{Stream, StreamExt};

/// Drop items equal to the item emitted just before them.
pub fn distinct_until_changed<S>(stream: S) -> impl Stream<Item = S::Item>
where
    S: Stream,
    S::Item: Clone + PartialEq,
{
    let mut last: Option<S::Item> = None;
    stream.filter(move |item| {
        let changed = last.as_ref() != Some(item);
        if changed {
            last = Some(item.clone());
        }
        future::ready(changed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn repeated_items_are_collapsed() {
        let items: Vec<i32> = distinct_until_changed(stream::iter(vec![1, 1, 2, 2, 2, 1, 3, 3]))
            .collect()
            .await;
        assert_eq!(items, vec![1, 2, 1, 3]);
    }

    #[tokio::test]
    async fn first_item_always_passes() {
        let items: Vec<&str> = distinct_until_changed(stream::iter(vec!["x"])).collect().await;
        assert_eq!(items, vec!["x"]);
    }
}
