//! Default visuals: the fallback marker and the floating image callout.

use crate::config::MarkerStyle;

use super::node::{Constraint, FreeAxes, Geometry, ImageHandle, Material, VisualNode};

/// Fallback marker used when no node provider supplies a visual.
pub fn default_marker(style: &MarkerStyle) -> VisualNode {
    VisualNode::new(
        Geometry::Sphere {
            radius: style.radius,
        },
        Material::Color(style.color),
    )
}

/// Plane size for an image, normalised so the shorter side is 1 m.
///
/// A zero-sized dimension is treated as one pixel.
pub fn callout_size(image: &ImageHandle) -> (f64, f64) {
    let w = image.width.max(1) as f64;
    let h = image.height.max(1) as f64;

    if w >= h {
        (w / h, 1.0)
    } else {
        (1.0, h / w)
    }
}

/// Billboard callout that floats `gap` meters above `primary`.
///
/// The callout sits at the primary node's position with its height replaced
/// by the primary's bounding-box height plus `gap`, and only yaws to face the
/// viewer so it stays upright.
pub fn callout_node(image: &ImageHandle, primary: &VisualNode, gap: f64) -> VisualNode {
    let (width, height) = callout_size(image);

    let (min, max) = primary.bounding_box();
    let mut position = primary.position;
    position.y = (max.y - min.y) + gap;

    VisualNode::new(
        Geometry::Plane { width, height },
        Material::Image(image.clone()),
    )
    .with_position(position)
    .with_constraint(Constraint::Billboard {
        free_axes: FreeAxes::Y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::node::Rgba;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_default_marker_is_red_sphere() {
        let node = default_marker(&MarkerStyle::default());
        assert_eq!(node.geometry, Geometry::Sphere { radius: 0.2 });
        assert_eq!(node.material, Material::Color(Rgba::RED));
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_callout_size_landscape_and_portrait() {
        let (w, h) = callout_size(&ImageHandle::new("wide", 200, 100));
        assert_relative_eq!(w, 2.0);
        assert_relative_eq!(h, 1.0);

        let (w, h) = callout_size(&ImageHandle::new("tall", 100, 400));
        assert_relative_eq!(w, 1.0);
        assert_relative_eq!(h, 4.0);
    }

    #[test]
    fn test_callout_size_degenerate_image() {
        let (w, h) = callout_size(&ImageHandle::new("empty", 0, 0));
        assert_relative_eq!(w, 1.0);
        assert_relative_eq!(h, 1.0);
    }

    #[test]
    fn test_callout_floats_above_primary() {
        let primary = default_marker(&MarkerStyle::default())
            .with_position(Vector3::new(1.0, 0.0, -2.0));
        let image = ImageHandle::new("star", 64, 64);

        let callout = callout_node(&image, &primary, 0.5);

        assert_relative_eq!(callout.position, Vector3::new(1.0, 0.9, -2.0), epsilon = 1e-12);
        assert_eq!(callout.material, Material::Image(image));
        assert_eq!(
            callout.constraints,
            vec![Constraint::Billboard {
                free_axes: FreeAxes::Y
            }]
        );
    }
}
