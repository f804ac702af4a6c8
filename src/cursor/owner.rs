use std::cell::Cell;
use std::rc::Rc;

/// Liveness shared between an executor and the cursors it hands out.
///
/// Every cursor leases the generation current when it was made. Bumping the
/// generation kills all outstanding leases at once.
#[derive(Debug, Default)]
pub(crate) struct Owner {
    generation: Cell<u64>,
    close_on_completion: Cell<bool>,
    close_requested: Cell<bool>,
}

impl Owner {
    pub(crate) fn lease(self: &Rc<Self>) -> Lease {
        Lease {
            owner: Rc::clone(self),
            generation: self.generation.get(),
        }
    }

    pub(crate) fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub(crate) fn close_on_completion(&self) -> bool {
        self.close_on_completion.get()
    }

    pub(crate) fn set_close_on_completion(&self, close: bool) {
        self.close_on_completion.set(close);
    }

    /// A live cursor was closed while close-on-completion was set.
    pub(crate) fn close_requested(&self) -> bool {
        self.close_requested.get()
    }
}

/// Cursor side of an [`Owner`].
#[derive(Debug, Clone)]
pub(crate) struct Lease {
    owner: Rc<Owner>,
    generation: u64,
}

impl Lease {
    pub(crate) fn is_live(&self) -> bool {
        self.owner.generation.get() == self.generation
    }

    /// The holding cursor was closed by its user.
    pub(crate) fn release(&self) {
        if self.is_live() && self.owner.close_on_completion() {
            tracing::debug!("cursor closed with close-on-completion set, closing executor");
            self.owner.close_requested.set(true);
            self.owner.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_kills_every_earlier_lease() {
        let owner = Rc::new(Owner::default());
        let first = owner.lease();
        let sibling = first.clone();
        assert!(first.is_live() && sibling.is_live());
        owner.invalidate();
        assert!(!first.is_live() && !sibling.is_live());
        assert!(owner.lease().is_live());
    }

    #[test]
    fn release_only_requests_close_when_asked_to() {
        let owner = Rc::new(Owner::default());
        owner.lease().release();
        assert!(!owner.close_requested());

        owner.set_close_on_completion(true);
        let stale = owner.lease();
        owner.invalidate();
        stale.release();
        assert!(!owner.close_requested());

        let live = owner.lease();
        live.release();
        assert!(owner.close_requested());
        assert!(!live.is_live());
    }
}
