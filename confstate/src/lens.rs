use std::fmt;

/// Accessor pair binding a schema node to one field of a host struct.
///
/// Bound once when the schema is built and reused for every host instance
/// the schema operates on. Use the [`lens!`](crate::lens!) macro to build one.
pub struct Lens<S, T> {
    get: fn(&S) -> &T,
    get_mut: fn(&mut S) -> &mut T,
}

impl<S, T> Lens<S, T> {
    pub const fn new(get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Self {
        Lens { get, get_mut }
    }

    pub fn get<'a>(&self, inst: &'a S) -> &'a T {
        (self.get)(inst)
    }

    pub fn get_mut<'a>(&self, inst: &'a mut S) -> &'a mut T {
        (self.get_mut)(inst)
    }
}

impl<S, T> Clone for Lens<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Lens<S, T> {}

impl<S, T> fmt::Debug for Lens<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens")
            .field("host", &std::any::type_name::<S>())
            .field("field", &std::any::type_name::<T>())
            .finish()
    }
}

/// Build a [`Lens`] for a (possibly nested) named field.
///
/// ```
/// use confstate::lens;
///
/// struct Net { port: u16 }
/// struct Config { net: Net }
///
/// let port = lens!(Config, net.port);
/// let mut cfg = Config { net: Net { port: 80 } };
/// *port.get_mut(&mut cfg) = 8080;
/// assert_eq!(*port.get(&cfg), 8080);
/// ```
#[macro_export]
macro_rules! lens {
    ($host:ty, $($field:ident).+) => {
        $crate::Lens::<$host, _>::new(|s| &s.$($field).+, |s| &mut s.$($field).+)
    };
}
