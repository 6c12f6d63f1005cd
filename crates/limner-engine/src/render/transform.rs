//! Model/view/projection bookkeeping shared by backends.

use glam::{Mat4, Vec3, Vec4};

use crate::coords::Viewport;
use crate::error::{BackendError, BackendResult};

/// Deepest `push_matrix` nesting a backend accepts.
pub const MATRIX_STACK_DEPTH: usize = 32;

/// Vertical field of view of the default perspective camera.
pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;

/// Orthographic projection bounds, in the order `ortho` takes them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ortho {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Ortho {
    /// Bounds that map the `z = 0` plane 1:1 onto the canvas under the
    /// default camera, which sits on the canvas center.
    pub fn canvas(viewport: Viewport) -> Self {
        let (hw, hh) = (viewport.width * 0.5, viewport.height * 0.5);
        let depth = viewport.width.max(viewport.height).max(1.0) * 10.0;
        Self {
            left: -hw,
            right: hw,
            bottom: -hh,
            top: hh,
            near: -depth,
            far: depth,
        }
    }
}

/// Transform stack, camera and projection for one canvas.
///
/// While a camera block is open, transforms accumulate into the block's
/// matrix instead of the model matrix. Closing the block multiplies the
/// view by the block matrix's inverse, so moving the camera right moves
/// the scene left.
#[derive(Debug, Clone)]
pub struct TransformState {
    viewport: Viewport,
    model: Mat4,
    stack: Vec<Mat4>,
    view: Mat4,
    projection: Mat4,
    camera_block: Option<Mat4>,
}

impl TransformState {
    pub fn new(viewport: Viewport) -> Self {
        let mut state = Self {
            viewport,
            model: Mat4::IDENTITY,
            stack: Vec::new(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_block: None,
        };
        state.camera_default();
        state
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopts a new canvas size and rebuilds the default camera.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera_default();
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn in_camera_block(&self) -> bool {
        self.camera_block.is_some()
    }

    /// Combined clip-from-object matrix.
    #[inline]
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    // ── model stack ───────────────────────────────────────────────────────

    pub fn push(&mut self) -> BackendResult {
        if self.stack.len() >= MATRIX_STACK_DEPTH {
            return Err(BackendError::StackOverflow(self.stack.len()));
        }
        self.stack.push(self.model);
        Ok(())
    }

    pub fn pop(&mut self) -> BackendResult {
        self.model = self.stack.pop().ok_or(BackendError::StackUnderflow)?;
        Ok(())
    }

    /// Model matrix back to identity. The stack is left alone.
    pub fn reset(&mut self) {
        *self.target() = Mat4::IDENTITY;
    }

    pub fn apply(&mut self, m: Mat4) {
        let t = self.target();
        *t = *t * m;
    }

    pub fn translate(&mut self, by: Vec3) {
        self.apply(Mat4::from_translation(by));
    }

    /// Rotation about `axis`. A zero axis is a no-op.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        if let Some(axis) = axis.try_normalize() {
            self.apply(Mat4::from_axis_angle(axis, angle));
        }
    }

    pub fn scale(&mut self, by: Vec3) {
        self.apply(Mat4::from_scale(by));
    }

    fn target(&mut self) -> &mut Mat4 {
        match self.camera_block.as_mut() {
            Some(block) => block,
            None => &mut self.model,
        }
    }

    // ── camera & projection ───────────────────────────────────────────────

    /// Eye on the canvas center axis, far enough back that the `z = 0`
    /// plane fills the view at a 60° field of view.
    pub fn camera_default(&mut self) {
        let w = self.viewport.width.max(1.0);
        let h = self.viewport.height.max(1.0);
        let eye_z = (h * 0.5) / (DEFAULT_FOV_Y * 0.5).tan();

        self.view = Mat4::look_at_rh(
            Vec3::new(w * 0.5, h * 0.5, eye_z),
            Vec3::new(w * 0.5, h * 0.5, 0.0),
            Vec3::Y,
        );
        self.projection = Mat4::perspective_rh_gl(DEFAULT_FOV_Y, w / h, eye_z / 10.0, eye_z * 10.0);
        self.camera_block = None;
    }

    pub fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> BackendResult {
        if (center - eye).length_squared() <= f32::EPSILON || up.length_squared() <= f32::EPSILON {
            return Err(BackendError::InvalidArgument {
                op: "camera",
                reason: "eye and center coincide or up is zero".into(),
            });
        }
        self.view = Mat4::look_at_rh(eye, center, up);
        Ok(())
    }

    pub fn begin_camera(&mut self) -> BackendResult {
        if self.camera_block.is_some() {
            return Err(BackendError::InvalidArgument {
                op: "begin_camera",
                reason: "camera block already open".into(),
            });
        }
        self.camera_block = Some(Mat4::IDENTITY);
        Ok(())
    }

    pub fn end_camera(&mut self) -> BackendResult {
        let block = self.camera_block.take().ok_or_else(|| BackendError::InvalidArgument {
            op: "end_camera",
            reason: "no camera block open".into(),
        })?;
        if block.determinant().abs() <= f32::EPSILON {
            return Err(BackendError::InvalidArgument {
                op: "end_camera",
                reason: "camera transform is singular".into(),
            });
        }
        self.view *= block.inverse();
        Ok(())
    }

    pub fn ortho(&mut self, b: Ortho) -> BackendResult {
        if b.left == b.right || b.bottom == b.top || b.near == b.far {
            return Err(BackendError::InvalidArgument {
                op: "ortho",
                reason: format!("degenerate bounds {b:?}"),
            });
        }
        self.projection = Mat4::orthographic_rh_gl(b.left, b.right, b.bottom, b.top, b.near, b.far);
        Ok(())
    }

    // ── projection to screen ──────────────────────────────────────────────

    /// Object-space point to `(x, y, depth)` in canvas pixels.
    ///
    /// Depth is NDC z in `[-1, 1]`, smaller is nearer. Points behind the
    /// eye return `None`.
    pub fn project(&self, p: Vec3) -> Option<Vec3> {
        project_with(self.mvp(), self.viewport, p)
    }
}

/// Same as `TransformState::project` with an explicit matrix.
pub fn project_with(mvp: Mat4, viewport: Viewport, p: Vec3) -> Option<Vec3> {
    let clip = mvp * Vec4::new(p.x, p.y, p.z, 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let (x, y) = viewport.ndc_to_screen(ndc.x, ndc.y);
    Some(Vec3::new(x, y, ndc.z))
}
