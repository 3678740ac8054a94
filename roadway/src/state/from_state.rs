use crate::state::{State, StateData};

/// Reads and moves values of one type in and out of `State`, named by the type itself.
///
/// Every `StateData` type gets this trait for free. The router uses it to hand request data to
/// handlers: `PathVars` after a successful match, and `RouteNonMatch` before a fallback runs.
///
/// ```rust
/// use hyper::{Body, Method, Response, StatusCode};
/// use roadway::helpers::http::response::create_response;
/// use roadway::router::builder::*;
/// use roadway::router::non_match::RouteNonMatch;
/// use roadway::state::{FromState, State};
///
/// fn refuse(state: State) -> (State, Response<Body>) {
///     let method = Method::borrow_from(&state).to_string();
///     let allowed = RouteNonMatch::try_borrow_from(&state)
///         .map(|non_match| non_match.allow().len())
///         .unwrap_or(0);
///
///     let body = format!("{} is not one of the {} allowed methods", method, allowed);
///     let res = create_response(&state, StatusCode::METHOD_NOT_ALLOWED, mime::TEXT_PLAIN, body);
///     (state, res)
/// }
///
/// fn main() {
///     build_router(|route| {
///         route.method_not_allowed(refuse);
///     });
/// }
/// ```
pub trait FromState: StateData + Sized {
    /// Borrows the value of this type, or `None` when the request never stored one.
    fn try_borrow_from(state: &State) -> Option<&Self>;

    /// Borrows the value of this type.
    ///
    /// # Panics
    ///
    /// When `State` holds no value of this type. Prefer `try_borrow_from` for values the router
    /// only stores conditionally, such as `PathVars`.
    fn borrow_from(state: &State) -> &Self;

    /// Mutably borrows the value of this type, or `None` when absent.
    fn try_borrow_mut_from(state: &mut State) -> Option<&mut Self>;

    /// Mutably borrows the value of this type.
    ///
    /// # Panics
    ///
    /// When `State` holds no value of this type.
    fn borrow_mut_from(state: &mut State) -> &mut Self;

    /// Removes the value of this type from `State`, or returns `None` when absent.
    fn try_take_from(state: &mut State) -> Option<Self>;

    /// Removes the value of this type from `State`, for example the request `Body`.
    ///
    /// # Panics
    ///
    /// When `State` holds no value of this type.
    fn take_from(state: &mut State) -> Self;
}

impl<T> FromState for T
where
    T: StateData,
{
    fn try_borrow_from(state: &State) -> Option<&Self> {
        state.try_borrow()
    }

    fn borrow_from(state: &State) -> &Self {
        state.borrow()
    }

    fn try_borrow_mut_from(state: &mut State) -> Option<&mut Self> {
        state.try_borrow_mut()
    }

    fn borrow_mut_from(state: &mut State) -> &mut Self {
        state.borrow_mut()
    }

    fn try_take_from(state: &mut State) -> Option<Self> {
        state.try_take()
    }

    fn take_from(state: &mut State) -> Self {
        state.take()
    }
}
