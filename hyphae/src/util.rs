use core::{fmt, ptr};

macro_rules! test_trace {
    ($($tt:tt)*) => {
        #[cfg(test)]
        tracing::trace!($($tt)*)
    }
}

/// Formats a pool reference as an address, so that `Debug` output of lists
/// and cursors shows which pool they belong to without dumping every slot.
pub(crate) struct FmtPool<'a, T>(pub(crate) &'a T);

impl<T> fmt::Debug for FmtPool<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", ptr::from_ref(self.0))
    }
}

/// Calls `f` when dropped, unless it has been defused.
///
/// Used to put node slots back on the free chain when user code (value
/// construction or destructors) unwinds halfway through an operation.
pub(crate) struct OnDrop<F: FnMut()> {
    f: Option<F>,
}

impl<F: FnMut()> OnDrop<F> {
    pub(crate) fn new(f: F) -> Self {
        Self { f: Some(f) }
    }

    pub(crate) fn defuse(mut self) {
        self.f = None;
    }
}

impl<F: FnMut()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.f.as_mut() {
            f();
        }
    }
}
