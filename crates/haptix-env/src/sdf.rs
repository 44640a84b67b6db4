use haptix_core::{Mat4, Vec3};

/// Below this squared gradient length projection is a no-op.
pub const GRAD_EPS2: f64 = 1e-18;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Query {
    pub phi: f64,
    pub grad: Vec3,
    pub proj: Vec3,
    pub inside: bool,
}

/// Implicit surface, world frame. Negative inside, zero on the boundary.
///
/// Cached world parameters are only refreshed by [`Environment::update`]; the
/// owner must call it after every pose change and before the next query.
pub trait Environment {
    fn phi(&self, x: Vec3) -> f64;

    /// Direction of increasing phi. Not necessarily unit length.
    fn grad(&self, x: Vec3) -> Vec3;

    fn project(&self, x: Vec3) -> Vec3 {
        newton_project(self.phi(x), self.grad(x), x)
    }

    fn update(&mut self, world_from_local: &Mat4);

    fn query(&self, x: Vec3) -> Query {
        let phi = self.phi(x);
        let grad = self.grad(x);
        Query { phi, grad, proj: newton_project(phi, grad, x), inside: phi < 0.0 }
    }

    fn normal(&self, x: Vec3) -> Option<Vec3> {
        let g = self.grad(x);
        let g2 = g.length_squared();
        if g2 <= GRAD_EPS2 { None } else { Some(g / g2.sqrt()) }
    }
}

/// One Newton step `x - phi * g / |g|^2`, identity on degenerate gradients.
#[inline]
pub fn newton_project(phi: f64, g: Vec3, x: Vec3) -> Vec3 {
    let g2 = g.length_squared();
    if g2 <= GRAD_EPS2 { return x; }
    x - g * (phi / g2)
}
