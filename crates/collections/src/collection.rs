//! The `Collection` contract shared by List, Set and Stack

/// Group of elements with membership defined by `Identity::equals`.
///
/// Bulk operations are provided in terms of single-element membership
/// tests, so `retain_all`/`remove_all` work against any other collection.
pub trait Collection<E> {
    /// Number of elements
    fn size(&self) -> usize;

    /// True if `e` is a member
    fn contains(&self, e: &E) -> bool;

    /// Add `e`; returns whether the collection changed
    fn add(&mut self, e: E) -> bool;

    /// Remove one element equal to `e`; returns whether one was found
    fn remove(&mut self, e: &E) -> bool;

    /// Remove every element matching `pred`; returns whether any was removed
    fn remove_if(&mut self, pred: &mut dyn FnMut(&E) -> bool) -> bool;

    /// Remove all elements
    fn clear(&mut self);

    /// Elements in iteration order
    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_>;

    /// True if the collection is empty
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// True if every element of `other` is a member
    fn contains_all<C: Collection<E> + ?Sized>(&self, other: &C) -> bool
    where
        Self: Sized,
    {
        other.elements().all(|e| self.contains(e))
    }

    /// Add each item; returns whether the collection changed
    fn add_all<I: IntoIterator<Item = E>>(&mut self, items: I) -> bool
    where
        Self: Sized,
    {
        items.into_iter().fold(false, |changed, e| self.add(e) | changed)
    }

    /// Remove every element that is a member of `other`
    fn remove_all<C: Collection<E> + ?Sized>(&mut self, other: &C) -> bool
    where
        Self: Sized,
    {
        self.remove_if(&mut |e| other.contains(e))
    }

    /// Keep only elements that are members of `other`
    fn retain_all<C: Collection<E> + ?Sized>(&mut self, other: &C) -> bool
    where
        Self: Sized,
    {
        self.remove_if(&mut |e| !other.contains(e))
    }

    /// Clone the elements into a `Vec` in iteration order
    fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.elements().cloned().collect()
    }
}
