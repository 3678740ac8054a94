//! Defines types for passing request state through `Middleware` and `Handler` implementations

mod from_state;
pub mod request_id;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::net::SocketAddr;

use hyper::{Body, Request};
use log::trace;

use crate::helpers::http::request::path::RequestPathSegments;

pub use crate::state::from_state::FromState;
pub use crate::state::request_id::request_id;

pub(crate) use crate::state::request_id::set_request_id;

/// A marker trait for types that can be stored in `State`.
///
/// Every `'static + Send` type qualifies, so the trait never needs to be implemented by hand.
pub trait StateData: Any + Send {}

impl<T> StateData for T where T: Any + Send {}

/// The address of the client which opened the connection for the current request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientAddr(pub SocketAddr);

/// Provides storage for request state, and stores one item of each type.
///
/// `State` is the per-request store into which the `Router` writes the path variables bound
/// while matching, and from which handlers and middleware read them back.
///
/// # Examples
///
/// ```rust
/// use roadway::state::State;
///
/// struct MyStruct {
///     value: i32,
/// }
///
/// State::with_new(|state| {
///     state.put(MyStruct { value: 1 });
///     assert_eq!(state.borrow::<MyStruct>().value, 1);
/// });
/// ```
pub struct State {
    data: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl State {
    /// Creates a new, empty `State` container. This is for internal use, because the ability to
    /// create a new `State` container would allow applications to incorrectly discard important
    /// request data.
    pub(crate) fn new() -> State {
        State {
            data: HashMap::new(),
        }
    }

    /// Creates a new, empty `State` and yields it mutably into the provided closure. Intended for
    /// documentation tests and unit tests only.
    #[doc(hidden)]
    pub fn with_new<F>(f: F)
    where
        F: FnOnce(&mut State),
    {
        f(&mut State::new())
    }

    /// Instantiates a new `State` for the given `Request`, moving each part of the request into
    /// storage and populating the normalized path segments and the request id.
    pub fn from_request(req: Request<Body>, client_addr: SocketAddr) -> State {
        let mut state = State::new();
        let (parts, body) = req.into_parts();

        state.put(ClientAddr(client_addr));
        state.put(RequestPathSegments::new(parts.uri.path()));
        state.put(parts.method);
        state.put(parts.uri);
        state.put(parts.version);
        state.put(parts.headers);
        state.put(body);

        set_request_id(&mut state);
        state
    }

    /// Puts a value into the `State` storage. One value of each type is retained. Successive calls
    /// to `put` will overwrite the existing value of the same type.
    pub fn put<T>(&mut self, t: T)
    where
        T: StateData,
    {
        let type_id = TypeId::of::<T>();
        trace!(" inserting record to state for type_id `{:?}`", type_id);
        self.data.insert(type_id, Box::new(t));
    }

    /// Determines if the current value exists in `State` storage.
    pub fn has<T>(&self) -> bool
    where
        T: StateData,
    {
        self.data.contains_key(&TypeId::of::<T>())
    }

    /// Tries to borrow a value from the `State` storage.
    pub fn try_borrow<T>(&self) -> Option<&T>
    where
        T: StateData,
    {
        let type_id = TypeId::of::<T>();
        trace!(" borrowing state data for type_id `{:?}`", type_id);
        self.data.get(&type_id).and_then(|b| b.downcast_ref::<T>())
    }

    /// Borrows a value from the `State` storage.
    ///
    /// # Panics
    ///
    /// If a value of type `T` is not present in `State`.
    pub fn borrow<T>(&self) -> &T
    where
        T: StateData,
    {
        self.try_borrow()
            .expect("required type is not present in State container")
    }

    /// Tries to mutably borrow a value from the `State` storage.
    pub fn try_borrow_mut<T>(&mut self) -> Option<&mut T>
    where
        T: StateData,
    {
        let type_id = TypeId::of::<T>();
        trace!(" mutably borrowing state data for type_id `{:?}`", type_id);
        self.data.get_mut(&type_id).and_then(|b| b.downcast_mut::<T>())
    }

    /// Mutably borrows a value from the `State` storage.
    ///
    /// # Panics
    ///
    /// If a value of type `T` is not present in `State`.
    pub fn borrow_mut<T>(&mut self) -> &mut T
    where
        T: StateData,
    {
        self.try_borrow_mut()
            .expect("required type is not present in State container")
    }

    /// Tries to move a value out of the `State` storage and return ownership.
    pub fn try_take<T>(&mut self) -> Option<T>
    where
        T: StateData,
    {
        let type_id = TypeId::of::<T>();
        trace!(
            " taking ownership from state data for type_id `{:?}`",
            type_id
        );
        self.data
            .remove(&type_id)
            .and_then(|b| b.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Moves a value out of the `State` storage and returns ownership.
    ///
    /// # Panics
    ///
    /// If a value of type `T` is not present in `State`.
    pub fn take<T>(&mut self) -> T
    where
        T: StateData,
    {
        self.try_take()
            .expect("required type is not present in State container")
    }
}

/// Returns the client address stored by the service, if any.
pub fn client_addr(state: &State) -> Option<SocketAddr> {
    ClientAddr::try_borrow_from(state).map(|addr| addr.0)
}
