//! Structural algorithms
//!
//! Equality, hashing, and text rendering driven entirely by the
//! [field catalog](crate::catalog): two values are equal when they have the
//! same type and pairwise-equal catalogued fields, and they print as their
//! type name followed by their fields.
//!
//! Object graphs may contain cycles through [`Object`] references. Equality
//! treats a pair of objects already under comparison as equal, hashing and
//! printing stop at an object already on the current path.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashSet, FxHasher};
use tracing::trace;

use crate::catalog;
use crate::config::RenderConfig;
use crate::shape::Structural;
use crate::value::{Object, Value};

/// Structural equality, hashing, and rendering for any structural type.
///
/// Blanket-implemented; use [`impl_structural!`](crate::impl_structural) to
/// wire these into `PartialEq`, `Hash`, and `Display`.
pub trait StructuralEquatable: Structural {
    /// Compare field-by-field with another structural value
    fn structural_eq(&self, other: &dyn Structural) -> bool
    where
        Self: Sized,
    {
        equals(self, other)
    }

    /// Hash of the catalogued field values
    fn structural_hash(&self) -> u64
    where
        Self: Sized,
    {
        let mut hasher = FxHasher::default();
        hash_into(self, &mut hasher);
        hasher.finish()
    }

    /// Multi-line `Name {\n  field: value\n}` rendering
    fn print_object(&self) -> String
    where
        Self: Sized,
    {
        print_object(self)
    }

    /// JSON-like rendering
    fn to_json(&self) -> String
    where
        Self: Sized,
    {
        object_to_json(self)
    }
}

impl<T: Structural> StructuralEquatable for T {}

// ============================================================================
// Equality
// ============================================================================

type PairSet = FxHashSet<(usize, usize)>;

/// Structural equality of two instances
pub fn equals(a: &dyn Structural, b: &dyn Structural) -> bool {
    eq_structural(a, b, &mut PairSet::default())
}

/// Equality of two values; objects compare structurally
pub fn values_equal(a: &Value, b: &Value) -> bool {
    eq_values(a, b, &mut PairSet::default())
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn eq_structural(a: &dyn Structural, b: &dyn Structural, seen: &mut PairSet) -> bool {
    let (ta, tb) = (a.shape(), b.shape());
    if ta.type_id() != tb.type_id() {
        return false;
    }
    for field in catalog::fields(&ta).iter() {
        match (field.read(a), field.read(b)) {
            (Ok(x), Ok(y)) => {
                if !eq_values(&x, &y, seen) {
                    return false;
                }
            }
            (Err(err), _) | (_, Err(err)) => {
                trace!(ty = ta.name(), field = field.name(), %err, "unreadable field, treating as unequal");
                return false;
            }
        }
    }
    true
}

fn eq_objects(x: &Object, y: &Object, seen: &mut PairSet) -> bool {
    if x.ptr_eq(y) {
        return true;
    }
    // Pair already being compared further up: assume equal
    let key = (x.id(), y.id());
    if !seen.insert(key) {
        return true;
    }
    let equal = {
        let (gx, gy) = (x.read(), y.read());
        eq_structural(&**gx, &**gy, seen)
    };
    seen.remove(&key);
    equal
}

fn eq_values(a: &Value, b: &Value, seen: &mut PairSet) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Byte(x), Value::Byte(y)) => x == y,
        (Value::Short(x), Value::Short(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Long(x), Value::Long(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => float_eq(*x as f64, *y as f64),
        (Value::Double(x), Value::Double(y)) => float_eq(*x, *y),
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(xs), Value::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| eq_values(x, y, seen))
        }
        (Value::Map(xs), Value::Map(ys)) => {
            if xs.len() != ys.len() {
                return false;
            }
            // Each entry of `ys` may pair with at most one entry of `xs`
            let mut used = vec![false; ys.len()];
            for (k, v) in xs {
                let slot = ys.iter().enumerate().position(|(i, (k2, v2))| {
                    !used[i] && eq_values(k, k2, seen) && eq_values(v, v2, seen)
                });
                match slot {
                    Some(i) => used[i] = true,
                    None => return false,
                }
            }
            true
        }
        (Value::Object(x), Value::Object(y)) => eq_objects(x, y, seen),
        _ => false,
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Feed the structural hash of an instance into `state`
pub fn hash_into<H: Hasher>(s: &dyn Structural, state: &mut H) {
    hash_structural(s, state, &mut FxHashSet::default());
}

/// Feed the hash of a value into `state`, consistent with [`values_equal`]
pub fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    hash_walk(value, state, &mut FxHashSet::default());
}

fn hash_f64<H: Hasher>(f: f64, state: &mut H) {
    let bits = if f == 0.0 {
        0u64
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    };
    bits.hash(state);
}

fn hash_structural<H: Hasher>(s: &dyn Structural, state: &mut H, path: &mut FxHashSet<usize>) {
    let ty = s.shape();
    ty.qualified_name().hash(state);
    for field in catalog::fields(&ty).iter() {
        if let Ok(value) = field.read(s) {
            hash_walk(&value, state, path);
        }
    }
}

fn hash_walk<H: Hasher>(value: &Value, state: &mut H, path: &mut FxHashSet<usize>) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Char(c) => c.hash(state),
        Value::Byte(i) => i.hash(state),
        Value::Short(i) => i.hash(state),
        Value::Int(i) => i.hash(state),
        Value::Long(i) => i.hash(state),
        Value::Float(f) => hash_f64(*f as f64, state),
        Value::Double(f) => hash_f64(*f, state),
        Value::Str(s) => s.hash(state),
        Value::List(items) => {
            items.len().hash(state);
            for item in items {
                hash_walk(item, state, path);
            }
        }
        Value::Map(entries) => {
            // Order-independent: sum of per-entry hashes
            let mut sum = 0u64;
            for (k, v) in entries {
                let mut entry = FxHasher::default();
                hash_walk(k, &mut entry, path);
                hash_walk(v, &mut entry, path);
                sum = sum.wrapping_add(entry.finish());
            }
            entries.len().hash(state);
            sum.hash(state);
        }
        Value::Object(obj) => {
            if !path.insert(obj.id()) {
                return;
            }
            {
                let guard = obj.read();
                hash_structural(&**guard, state, path);
            }
            path.remove(&obj.id());
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

struct Printer<'c> {
    config: &'c RenderConfig,
    inline: bool,
    path: FxHashSet<usize>,
    out: String,
}

impl<'c> Printer<'c> {
    fn new(config: &'c RenderConfig, inline: bool) -> Self {
        Self {
            config,
            inline,
            path: FxHashSet::default(),
            out: String::new(),
        }
    }

    fn pad(&mut self, depth: usize) {
        for _ in 0..self.config.indent * depth {
            self.out.push(' ');
        }
    }

    fn structural(&mut self, s: &dyn Structural, depth: usize) {
        let ty = s.shape();
        self.out.push_str(ty.name());
        self.out.push_str(if self.inline { "{" } else { " {\n" });

        let mut first = true;
        for field in catalog::fields(&ty).iter() {
            let value = match field.read(s) {
                Ok(value) => value,
                Err(err) => {
                    trace!(ty = ty.name(), field = field.name(), %err, "skipping unreadable field");
                    continue;
                }
            };
            if self.inline {
                if !first {
                    self.out.push_str(", ");
                }
            } else {
                self.pad(depth + 1);
            }
            first = false;
            self.out.push_str(field.name());
            self.out.push_str(": ");
            self.value(&value, depth + 1);
            if !self.inline {
                self.out.push('\n');
            }
        }

        if !self.inline {
            self.pad(depth);
        }
        self.out.push('}');
    }

    fn object(&mut self, obj: &Object, depth: usize) {
        if self.path.contains(&obj.id()) {
            self.out.push_str(&self.config.cycle_text);
            return;
        }
        self.path.insert(obj.id());
        {
            let guard = obj.read();
            self.structural(&**guard, depth);
        }
        self.path.remove(&obj.id());
    }

    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.out.push_str(&self.config.null_text),
            Value::Object(obj) => self.object(obj, depth),
            Value::List(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.value(item, depth);
                }
                self.out.push(']');
            }
            Value::Map(entries) => {
                self.out.push('{');
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.value(k, depth);
                    self.out.push_str(": ");
                    self.value(v, depth);
                }
                self.out.push('}');
            }
            scalar => push_scalar(&mut self.out, scalar),
        }
    }
}

fn push_scalar(out: &mut String, value: &Value) {
    use std::fmt::Write;
    // Writing into a String cannot fail
    let _ = match value {
        Value::Bool(b) => write!(out, "{}", b),
        Value::Char(c) => write!(out, "{}", c),
        Value::Byte(i) => write!(out, "{}", i),
        Value::Short(i) => write!(out, "{}", i),
        Value::Int(i) => write!(out, "{}", i),
        Value::Long(i) => write!(out, "{}", i),
        Value::Float(f) => write!(out, "{}", f),
        Value::Double(f) => write!(out, "{}", f),
        Value::Str(s) => write!(out, "{}", s),
        _ => Ok(()),
    };
}

/// Render with the default [`RenderConfig`]:
///
/// ```text
/// Point {
///   x: 1
///   y: 2
/// }
/// ```
pub fn print_object(s: &dyn Structural) -> String {
    print_object_with(s, &RenderConfig::default())
}

/// Render with explicit settings
pub fn print_object_with(s: &dyn Structural, config: &RenderConfig) -> String {
    let mut printer = Printer::new(config, false);
    printer.structural(s, 0);
    printer.out
}

/// Render a value; objects use the multi-line form
pub fn render_value(value: &Value) -> String {
    render_value_with(value, &RenderConfig::default())
}

/// Render a value with explicit settings
pub fn render_value_with(value: &Value, config: &RenderConfig) -> String {
    let mut printer = Printer::new(config, false);
    printer.value(value, 0);
    printer.out
}

/// Single-line `Name{a: x, b: y}` rendering
pub fn inline(s: &dyn Structural) -> String {
    let config = RenderConfig::default();
    let mut printer = Printer::new(&config, true);
    printer.structural(s, 0);
    printer.out
}

// ============================================================================
// JSON-like Rendering
// ============================================================================

struct JsonWriter {
    path: FxHashSet<usize>,
    out: String,
}

impl JsonWriter {
    fn new() -> Self {
        Self {
            path: FxHashSet::default(),
            out: String::new(),
        }
    }

    fn quoted(&mut self, text: String) {
        self.out.push_str(&serde_json::Value::String(text).to_string());
    }

    fn on_path(&self, value: &Value) -> bool {
        matches!(value, Value::Object(obj) if self.path.contains(&obj.id()))
    }

    fn structural(&mut self, s: &dyn Structural) {
        let ty = s.shape();
        self.out.push('{');
        let mut first = true;
        for field in catalog::fields(&ty).iter() {
            let value = match field.read(s) {
                Ok(value) => value,
                Err(err) => {
                    trace!(ty = ty.name(), field = field.name(), %err, "omitting unreadable field");
                    continue;
                }
            };
            if self.on_path(&value) {
                trace!(ty = ty.name(), field = field.name(), "omitting cyclic field");
                continue;
            }
            if !first {
                self.out.push_str(", ");
            }
            first = false;
            self.quoted(field.name().to_string());
            self.out.push_str(": ");
            self.value(&value);
        }
        self.out.push('}');
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Char(c) => self.quoted(c.to_string()),
            Value::Str(s) => self.quoted(s.clone()),
            Value::List(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.value(item);
                }
                self.out.push(']');
            }
            Value::Map(entries) => {
                self.out.push('{');
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.value(k);
                    self.out.push_str(": ");
                    self.value(v);
                }
                self.out.push('}');
            }
            Value::Object(obj) => {
                if !self.path.insert(obj.id()) {
                    self.out.push_str("null");
                    return;
                }
                {
                    let guard = obj.read();
                    self.structural(&**guard);
                }
                self.path.remove(&obj.id());
            }
            scalar => push_scalar(&mut self.out, scalar),
        }
    }
}

/// JSON-like rendering of a value.
///
/// Text is quoted and escaped, primitives appear as literals, objects become
/// `{"field": value, ...}`. Fields referring back to an object currently
/// being rendered are omitted.
pub fn to_json(value: &Value) -> String {
    let mut writer = JsonWriter::new();
    writer.value(value);
    writer.out
}

/// JSON-like rendering of an instance
pub fn object_to_json(s: &dyn Structural) -> String {
    let mut writer = JsonWriter::new();
    writer.structural(s);
    writer.out
}
