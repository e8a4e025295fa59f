use glam::Vec2;
use intensity_core::SurfaceBounds;
use web_sys as web;

#[inline]
pub fn element_bounds(el: &web::Element) -> SurfaceBounds {
    let rect = el.get_bounding_client_rect();
    SurfaceBounds::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Pointer position in viewport coordinates, the same space as the bounds.
#[inline]
pub fn pointer_client_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}
