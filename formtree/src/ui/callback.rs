use std::{fmt, rc::Rc};

/// A cloneable, single-threaded event handler.
pub struct Callback<T> {
    f: Rc<dyn Fn(T)>,
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl<T: 'static> Callback<T> {
    pub fn new(f: impl Fn(T) + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// A callback that does nothing.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn emit(&self, value: T) {
        (self.f)(value)
    }

    /// A callback that converts its input with `map` before emitting here.
    pub fn map<U: 'static>(&self, map: impl Fn(U) -> T + 'static) -> Callback<U> {
        let inner = self.clone();
        Callback::new(move |value| inner.emit(map(value)))
    }
}

/// Setter handed to renderers for the value they display.
///
/// [`Setter::set`] replaces the value; [`Setter::update`] computes the next
/// value from the one the setter was created with, which is what list
/// editors use to append or remove elements.
pub struct Setter<T> {
    current: Rc<T>,
    apply: Callback<T>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            current: Rc::clone(&self.current),
            apply: self.apply.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Setter<T> {
    pub fn new(current: T, apply: Callback<T>) -> Self {
        Self {
            current: Rc::new(current),
            apply,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn set(&self, value: T) {
        self.apply.emit(value)
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.apply.emit(f(&self.current))
    }

    /// The underlying callback, for wiring into an element.
    pub fn callback(&self) -> Callback<T> {
        self.apply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_map_and_update() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            Callback::new(move |v: Vec<u32>| seen.borrow_mut().push(v))
        };

        let setter = Setter::new(vec![1], sink.map(|v: Vec<u32>| v.into_iter().rev().collect()));
        setter.update(|prev| {
            let mut next = prev.clone();
            next.push(2);
            next
        });
        setter.set(vec![5, 6]);

        assert_eq!(*seen.borrow(), vec![vec![2, 1], vec![6, 5]]);
        assert_eq!(setter.current(), &vec![1]);
    }
}
