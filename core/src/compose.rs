//! Right-to-left composition of single-argument functions.
//!
//! Used to build a middleware chain over a dispatch function and to stack
//! store enhancers.

use std::rc::Rc;

/// A shared single-argument function from `T` to `T`.
pub type Unary<T> = Rc<dyn Fn(T) -> T>;

/// Compose `fns` right to left: `compose(vec![f, g, h])(x) == f(g(h(x)))`.
///
/// An empty list yields the identity function. A single function is
/// returned as is, without wrapping.
///
/// ```
/// use reduxide_core::compose::{compose, Unary};
/// use std::rc::Rc;
///
/// let add_one: Unary<i64> = Rc::new(|x| x + 1);
/// let double: Unary<i64> = Rc::new(|x| x * 2);
///
/// assert_eq!(compose(vec![add_one, double])(5), 11);
/// assert_eq!(compose::<i64>(vec![])(5), 5);
/// ```
#[must_use]
pub fn compose<T: 'static>(fns: Vec<Unary<T>>) -> Unary<T> {
    fns.into_iter()
        .reduce(|outer, inner| Rc::new(move |x: T| outer(inner(x))))
        .unwrap_or_else(|| Rc::new(|x: T| x))
}
