/// Browser-side id generator: millisecond timestamp plus a random suffix.
/// The core generator needs a system clock the wasm sandbox lacks.
pub fn make_id() -> String {
    let now = js_sys::Date::now() as u64;
    let rand = (js_sys::Math::random() * (u32::MAX as f64 + 1.0)) as u32;
    format!("{now:x}-{rand:08x}")
}
