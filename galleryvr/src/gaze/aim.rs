use cgmath::{vec3, InnerSpace, Quaternion, Vector2, Vector3};

use crate::registry::{Target, TargetRegistry};

/// Directions shorter than this are treated as degenerate input
const MIN_DIRECTION_MAGNITUDE2: f32 = 1e-12;

/// A world-space ray used for hit-testing targets.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Unit-direction copy of this ray, or `None` for a zero-length direction.
    fn normalized(&self) -> Option<Ray> {
        if self.direction.magnitude2() < MIN_DIRECTION_MAGNITUDE2 {
            return None;
        }
        Some(Ray {
            origin: self.origin,
            direction: self.direction.normalize(),
        })
    }
}

/// Camera pose sampled by the host each tick.
///
/// Forward is -Z in camera space, matching the render convention. The FOV
/// and aspect ratio are only needed for projecting 2D pointer positions.
#[derive(Clone, Copy, Debug)]
pub struct CameraPose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub fov_y_degrees: f32,
    pub aspect: f32,
}

impl CameraPose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self {
            position,
            rotation,
            fov_y_degrees: 60.0,
            aspect: 4.0 / 3.0,
        }
    }

    pub fn with_projection(mut self, fov_y_degrees: f32, aspect: f32) -> Self {
        self.fov_y_degrees = fov_y_degrees;
        self.aspect = aspect;
        self
    }

    /// Pose at `position` looking toward `look_at`.
    pub fn facing(position: Vector3<f32>, look_at: Vector3<f32>) -> Self {
        let forward = look_at - position;
        let rotation = if forward.magnitude2() < MIN_DIRECTION_MAGNITUDE2 {
            Quaternion::new(1.0, 0.0, 0.0, 0.0)
        } else {
            Quaternion::from_arc(vec3(0.0, 0.0, -1.0), forward.normalize(), None)
        };
        Self::new(position, rotation)
    }

    /// Ray along the camera's forward direction (gaze aiming).
    pub fn gaze_ray(&self) -> Ray {
        let forward = self.rotation * vec3(0.0, 0.0, -1.0);
        Ray::new(self.position, forward)
    }

    /// Ray through a pointer position in normalized device coordinates
    /// (x and y in [-1, 1], +y up), projected with the camera's FOV.
    pub fn pointer_ray(&self, ndc: Vector2<f32>) -> Ray {
        let half_height = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction =
            self.rotation * vec3(ndc.x * half_width, ndc.y * half_height, -1.0);
        Ray::new(self.position, direction)
    }
}

/// Resolve the target a ray is aimed at: the closest intersection along the
/// ray wins, ties broken by registry iteration order. Degenerate rays and
/// empty registries resolve to `None` rather than an error.
pub fn resolve<'a>(ray: &Ray, registry: &'a TargetRegistry) -> Option<&'a Target> {
    let ray = ray.normalized()?;

    let mut best: Option<(f32, &Target)> = None;
    for target in registry.all() {
        if !target.is_enabled() {
            continue;
        }
        if let Some(distance) = intersect_sphere(&ray, target.position(), target.radius()) {
            // Strict comparison keeps the earlier registry entry on a tie
            let closer = match best {
                Some((best_distance, _)) => distance < best_distance,
                None => true,
            };
            if closer {
                best = Some((distance, target));
            }
        }
    }

    best.map(|(_, target)| target)
}

/// Distance along a unit ray to a sphere, or `None` on a miss. A ray
/// starting inside the sphere hits at the exit point.
fn intersect_sphere(ray: &Ray, center: Vector3<f32>, radius: f32) -> Option<f32> {
    let to_origin = ray.origin - center;
    let b = to_origin.dot(ray.direction);
    let c = to_origin.magnitude2() - radius * radius;
    let discriminant = b * b - c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let near = -b - sqrt_discriminant;
    if near >= 0.0 {
        return Some(near);
    }

    let far = -b + sqrt_discriminant;
    if far >= 0.0 {
        return Some(far);
    }

    None
}
