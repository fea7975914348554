//! Typed access to named fields of a JSON entry object.
//!
//! Every accessor reports failures as a human-readable message; the decoder
//! attaches the entry path.

use mapgraft_math::{Quat, Vec2, Vec3};
use serde_json::{Map, Value};

pub(super) type FieldResult<T> = Result<T, String>;

type Object = Map<String, Value>;

fn field<'a>(obj: &'a Object, name: &str) -> FieldResult<&'a Value> {
    obj.get(name).ok_or_else(|| format!("missing field '{}'", name))
}

/// Numbers are decoded as 32-bit floats.
fn number(value: &Value, name: &str) -> FieldResult<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| format!("field '{}' contains a non-number: {}", name, value))
}

fn components<const N: usize>(value: &Value, name: &str) -> FieldResult<[f32; N]> {
    let array = value
        .as_array()
        .ok_or_else(|| format!("field '{}' is not an array", name))?;

    if array.len() != N {
        return Err(format!(
            "field '{}' has {} components, expected {}",
            name,
            array.len(),
            N
        ));
    }

    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(array) {
        *slot = number(item, name)?;
    }
    Ok(out)
}

pub(super) fn vec3(obj: &Object, name: &str) -> FieldResult<Vec3> {
    components::<3>(field(obj, name)?, name).map(Vec3::from_array)
}

pub(super) fn optional_vec2(obj: &Object, name: &str) -> FieldResult<Option<Vec2>> {
    obj.get(name)
        .map(|value| components::<2>(value, name).map(Vec2::from_array))
        .transpose()
}

/// Rotation is stored `[x, y, z, w]` and kept exactly as written.
pub(super) fn quat(obj: &Object, name: &str) -> FieldResult<Quat> {
    components::<4>(field(obj, name)?, name).map(Quat::from_array)
}

/// Scale is either a 3-component array or, in older exports, a single number.
pub(super) fn scale(obj: &Object, name: &str) -> FieldResult<Vec3> {
    let value = field(obj, name)?;
    if value.is_number() {
        number(value, name).map(Vec3::splat)
    } else {
        components::<3>(value, name).map(Vec3::from_array)
    }
}

pub(super) fn string(obj: &Object, name: &str) -> FieldResult<String> {
    field(obj, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| format!("field '{}' is not a string", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_vec3_field() {
        let obj = object(json!({ "Translation": [1.0, 2.5, -3] }));
        assert_eq!(vec3(&obj, "Translation").unwrap(), Vec3::new(1.0, 2.5, -3.0));
    }

    #[test]
    fn test_wrong_arity() {
        let obj = object(json!({ "Translation": [1.0, 2.0], "Rotation": [0, 0, 0] }));
        let err = vec3(&obj, "Translation").unwrap_err();
        assert!(err.contains("expected 3"), "{err}");
        assert!(quat(&obj, "Rotation").unwrap_err().contains("expected 4"));
    }

    #[test]
    fn test_missing_and_non_numeric() {
        let obj = object(json!({ "Scale": [1, "x", 1] }));
        assert!(vec3(&obj, "Translation").unwrap_err().contains("missing field"));
        assert!(scale(&obj, "Scale").unwrap_err().contains("non-number"));
    }

    #[test]
    fn test_scalar_scale() {
        let obj = object(json!({ "Scale": 2.0 }));
        assert_eq!(scale(&obj, "Scale").unwrap(), Vec3::splat(2.0));
    }

    #[test]
    fn test_quat_not_normalized() {
        let obj = object(json!({ "Rotation": [0, 0, 0, 2] }));
        let q = quat(&obj, "Rotation").unwrap();
        assert_eq!(q.w, 2.0);
    }

    #[test]
    fn test_optional_vec2() {
        let obj = object(json!({ "Size": [4, 2] }));
        assert_eq!(optional_vec2(&obj, "Size").unwrap(), Some(Vec2::new(4.0, 2.0)));
        assert_eq!(optional_vec2(&obj, "Other").unwrap(), None);
    }
}
