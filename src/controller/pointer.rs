use crate::engine::ParamMap;

// The second eyebrow name carries a trailing NUL in the puppet files.
const MOVE_PARAMS: [&str; 2] = ["Eye:: Left:: Move", "Eye:: Right:: Move"];
const XY_PARAMS: [&str; 2] = ["Eye:: Left:: XY", "Eye:: Right:: XY"];
const BROW_PARAMS: [&str; 2] = ["Eyebrow:: Left", "Eyebrow:: Right\0"];

/// Eye and eyebrow parameters for a pointer at `(x, y)` inside a `width` x `height`
/// viewport. Returns `None` for an empty viewport.
pub fn pointer_params(x: f32, y: f32, width: f32, height: f32) -> Option<ParamMap> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let nx = x / width;
    let ny = y / height;

    let mut params = ParamMap::new();
    for name in MOVE_PARAMS {
        params.insert(name, [nx, 0.0]);
    }
    for name in XY_PARAMS {
        params.insert(name, [nx, 1.0 - ny]);
    }
    for name in BROW_PARAMS {
        params.insert(name, [ny, 0.0]);
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_corner() {
        let params = pointer_params(0.0, 0.0, 800.0, 600.0).unwrap();
        assert_eq!(params.get("Eye:: Left:: XY"), Some([0.0, 1.0]));
        assert_eq!(params.get("Eye:: Right:: XY"), Some([0.0, 1.0]));
        assert_eq!(params.get("Eye:: Left:: Move"), Some([0.0, 0.0]));
        assert_eq!(params.get("Eyebrow:: Left"), Some([0.0, 0.0]));
    }

    #[test]
    fn bottom_right_corner() {
        let params = pointer_params(800.0, 600.0, 800.0, 600.0).unwrap();
        assert_eq!(params.get("Eye:: Left:: XY"), Some([1.0, 0.0]));
        assert_eq!(params.get("Eye:: Right:: XY"), Some([1.0, 0.0]));
        assert_eq!(params.get("Eye:: Right:: Move"), Some([1.0, 0.0]));
        assert_eq!(params.get("Eyebrow:: Right\0"), Some([1.0, 0.0]));
    }

    #[test]
    fn six_parameters_per_event() {
        let params = pointer_params(200.0, 150.0, 800.0, 600.0).unwrap();
        assert_eq!(params.len(), 6);
        assert_eq!(params.get("Eye:: Left:: XY"), Some([0.25, 0.75]));
        assert_eq!(params.get("Eyebrow:: Left"), Some([0.25, 0.0]));
    }

    #[test]
    fn empty_viewport_yields_nothing() {
        assert!(pointer_params(10.0, 10.0, 0.0, 600.0).is_none());
        assert!(pointer_params(10.0, 10.0, 800.0, 0.0).is_none());
    }
}
