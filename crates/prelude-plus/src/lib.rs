pub use std::borrow::{Borrow, Cow};
pub use std::cell::{Cell, Ref, RefCell, RefMut};
pub use std::cmp;
pub use std::collections::{BTreeMap, HashMap, HashSet};
pub use std::convert::{TryFrom, TryInto};
pub use std::env;
pub use std::ffi::{CStr, CString};
pub use std::fmt;
pub use std::fs::{self, File};
pub use std::io::{self, BufReader, Read};
pub use std::iter;
pub use std::marker::PhantomData;
pub use std::mem;
pub use std::ops::{Deref, DerefMut, Range};
pub use std::os::raw::*;
pub use std::path::{Path, PathBuf};
pub use std::ptr;
pub use std::rc::{Rc, Weak as RcWeak};
pub use std::slice;
pub use std::time::{Duration, Instant};
pub use std::{f32, f64, str};

#[cfg(feature = "anyhow")]
pub use ::anyhow::{
  self, bail, ensure, format_err, Context as ResultContextExt, Error as AnyError,
  Result as AnyResult,
};
#[cfg(feature = "bitflags")]
pub use ::bitflags::bitflags;
#[cfg(feature = "log")]
pub use ::log::{self, debug, error, info, log, log_enabled, trace, warn, Level as LogLevel};
