use tracing::debug;

use crate::error::Error;
use crate::geometry::Ray;
use crate::material::Material;
use crate::shapes::Shape;
use crate::{Float, Point3f, Vec3f, INFINITY};

/// Hits closer than this to the ray origin are ignored by scene queries.
pub const DIST_EPSILON: Float = 1e-5;

/// Index of a shape in the scene's geometry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeomId(pub usize);

/// Index of a material in the scene's material arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialId(pub usize);

/// Closest-hit query result. Carries arena indices rather than references so
/// it stays valid independently of scene storage.
#[derive(Clone, Copy, Debug)]
pub struct HitRecord {
    pub p: Point3f,
    pub n: Vec3f,
    pub t: Float,
    pub geom: GeomId,
    pub material: MaterialId,
}

/// Immutable scene: geometry and material arenas plus the derived emitter
/// list. Built once, read-only for the duration of a render.
pub struct Scene {
    shapes: Vec<Shape>,
    shape_materials: Vec<MaterialId>,
    materials: Vec<Material>,
    emitters: Vec<GeomId>,
}

#[derive(Default)]
pub struct SceneBuilder {
    shapes: Vec<Shape>,
    shape_materials: Vec<MaterialId>,
    materials: Vec<Material>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn add_shape(&mut self, shape: Shape, material: MaterialId) -> GeomId {
        self.shapes.push(shape);
        self.shape_materials.push(material);
        GeomId(self.shapes.len() - 1)
    }

    /// Validates the arenas and derives the emitter list. This is the single
    /// point where bad scene data is rejected; after it succeeds the render
    /// loop never sees an invalid index or a non-finite parameter.
    pub fn build(self) -> Result<Scene, Error> {
        for (i, shape) in self.shapes.iter().enumerate() {
            if !shape.is_finite() {
                return Err(Error::NonFiniteGeometry(i));
            }
        }
        for mat_id in &self.shape_materials {
            if mat_id.0 >= self.materials.len() {
                return Err(Error::UnknownMaterial(mat_id.0));
            }
        }

        let emitters: Vec<GeomId> = self
            .shape_materials
            .iter()
            .enumerate()
            .filter(|(_, mat_id)| self.materials[mat_id.0].is_emissive())
            .map(|(i, _)| GeomId(i))
            .collect();

        debug!(
            shapes = self.shapes.len(),
            emitters = emitters.len(),
            "scene built"
        );

        Ok(Scene {
            shapes: self.shapes,
            shape_materials: self.shape_materials,
            materials: self.materials,
            emitters,
        })
    }
}

impl Scene {
    /// Nearest hit with `t >= DIST_EPSILON`, linear over all shapes. Scene
    /// sizes here are tens of primitives; no acceleration structure.
    pub fn intersect_closest(&self, ray: &Ray) -> Option<HitRecord> {
        let mut closest = INFINITY;
        let mut record = None;

        for (i, shape) in self.shapes.iter().enumerate() {
            if let Some(hit) = shape.intersect(ray) {
                if hit.t >= DIST_EPSILON && hit.t < closest {
                    closest = hit.t;
                    record = Some(HitRecord {
                        p: hit.p,
                        n: hit.n,
                        t: hit.t,
                        geom: GeomId(i),
                        material: self.shape_materials[i],
                    });
                }
            }
        }

        record
    }

    pub fn shape(&self, id: GeomId) -> &Shape {
        &self.shapes[id.0]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn material_of(&self, id: GeomId) -> &Material {
        self.material(self.shape_materials[id.0])
    }

    /// Shapes whose emissive radiance has a positive maximum channel,
    /// derived once at build time. May be empty; direct light sampling then
    /// contributes nothing.
    pub fn emitters(&self) -> &[GeomId] {
        &self.emitters
    }

    pub fn num_shapes(&self) -> usize {
        self.shapes.len()
    }
}
