use log::{debug, info};
use nalgebra::Point3;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry;
use crate::matrix::PointMatrix;
use crate::ops::Operation;
use crate::scene::{self, DepthBuffer, DrawStats, PixelBuffer};
use crate::stack::FrameStack;
use crate::transform;

/// Receives the image on SAVE.
pub trait Persist {
    fn save(&mut self, pixels: &PixelBuffer, name: &str) -> Result<()>;
}

/// Receives the image on DISPLAY.
pub trait Present {
    fn display(&mut self, pixels: &PixelBuffer) -> Result<()>;
}

/// State of one render pass: the frame stack, both buffers and a scratch point
/// matrix reused by every drawable operation.
pub struct Interpreter {
    config: RenderConfig,
    frames: FrameStack,
    pixels: PixelBuffer,
    depth: DepthBuffer,
    scratch: PointMatrix,
}

impl Interpreter {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let pixels = PixelBuffer::new(config.width, config.height, config.background);
        let depth = DepthBuffer::new(config.width, config.height);
        let scratch = PointMatrix::new(config.initial_columns, config.max_columns);
        return Ok(Self {
            config,
            frames: FrameStack::new(),
            pixels,
            depth,
            scratch,
        });
    }

    pub fn pixels(&self) -> &PixelBuffer {
        return &self.pixels;
    }

    pub fn depth(&self) -> &DepthBuffer {
        return &self.depth;
    }

    pub fn frames(&self) -> &FrameStack {
        return &self.frames;
    }

    pub fn into_pixels(self) -> PixelBuffer {
        return self.pixels;
    }

    /// Executes every operation in order. The first fatal error aborts the pass.
    pub fn run<P: Persist, D: Present>(
        &mut self,
        ops: &[Operation],
        persist: &mut P,
        present: &mut D,
    ) -> Result<DrawStats> {
        info!(
            "render pass: {} operations into {}x{}",
            ops.len(),
            self.config.width,
            self.config.height
        );
        let mut total = DrawStats::default();
        for (i, op) in ops.iter().enumerate() {
            debug!("op {}: {}", i, op.kind());
            total += self.execute(op, persist, present)?;
        }
        info!(
            "render pass done: {} drawn, {} culled, {} degenerate",
            total.drawn, total.culled, total.degenerate
        );
        return Ok(total);
    }

    /// Executes a single operation.
    pub fn execute<P: Persist, D: Present>(
        &mut self,
        op: &Operation,
        persist: &mut P,
        present: &mut D,
    ) -> Result<DrawStats> {
        match op {
            Operation::Push => self.frames.push(),
            Operation::Pop => self.frames.pop()?,
            Operation::Move { offset } => {
                self.frames.apply(&transform::translation(offset.x, offset.y, offset.z));
            }
            Operation::Scale { factors } => {
                self.frames.apply(&transform::scale(factors.x, factors.y, factors.z));
            }
            Operation::Rotate { axis, degrees } => {
                self.frames.apply(&transform::rotation(*axis, *degrees));
            }
            Operation::Box { corner_0, corner_1 } => {
                geometry::add_box(&mut self.scratch, *corner_0, *corner_1)?;
                return Ok(self.draw_solid());
            }
            Operation::Sphere { center, radius } => {
                geometry::add_sphere(&mut self.scratch, *center, *radius, self.config.step)?;
                return Ok(self.draw_solid());
            }
            Operation::Torus {
                center,
                inner_radius,
                outer_radius,
            } => {
                geometry::add_torus(
                    &mut self.scratch,
                    *center,
                    *inner_radius,
                    *outer_radius,
                    self.config.step,
                )?;
                return Ok(self.draw_solid());
            }
            Operation::Line { p0, p1 } => {
                return self.draw_segment(*p0, *p1);
            }
            Operation::Save { name } => persist.save(&self.pixels, name)?,
            Operation::Display => present.display(&self.pixels)?,
        }
        return Ok(DrawStats::default());
    }

    /// Moves the scratch points into world space, draws them as triangles and
    /// empties the scratch matrix.
    fn draw_solid(&mut self) -> DrawStats {
        self.scratch.transform(self.frames.peek());
        let stats = scene::draw_polygons(
            &self.scratch,
            &mut self.pixels,
            &mut self.depth,
            &self.config.lighting,
        );
        debug!(
            "{} triangles: {} drawn, {} culled",
            self.scratch.len() / 3,
            stats.drawn,
            stats.culled
        );
        self.scratch.clear();
        return stats;
    }

    fn draw_segment(&mut self, p0: Point3<f64>, p1: Point3<f64>) -> Result<DrawStats> {
        geometry::add_edge(&mut self.scratch, p0, p1)?;
        self.scratch.transform(self.frames.peek());
        let stats =
            scene::draw_lines(&self.scratch, &mut self.pixels, &self.depth, self.config.line_color);
        self.scratch.clear();
        return Ok(stats);
    }
}

/// Runs a whole pass with a fresh interpreter and returns the final image.
pub fn render<P: Persist, D: Present>(
    ops: &[Operation],
    config: RenderConfig,
    persist: &mut P,
    present: &mut D,
) -> Result<PixelBuffer> {
    let mut interpreter = Interpreter::new(config)?;
    interpreter.run(ops, persist, present)?;
    return Ok(interpreter.into_pixels());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::scene::Color;
    use crate::transform::Axis;
    use nalgebra::{point, vector, Matrix4};
    use test_log::test;

    /// Collaborator that only counts calls.
    #[derive(Default)]
    struct Counter {
        saves: Vec<String>,
        displays: usize,
    }

    impl Persist for Counter {
        fn save(&mut self, _pixels: &PixelBuffer, name: &str) -> Result<()> {
            self.saves.push(name.to_string());
            return Ok(());
        }
    }

    impl Present for Counter {
        fn display(&mut self, _pixels: &PixelBuffer) -> Result<()> {
            self.displays += 1;
            return Ok(());
        }
    }

    fn small_config() -> RenderConfig {
        return RenderConfig {
            width: 100,
            height: 100,
            step: 6,
            ..Default::default()
        };
    }

    fn run(interpreter: &mut Interpreter, ops: &[Operation]) -> Result<DrawStats> {
        let mut persist = Counter::default();
        let mut present = Counter::default();
        return interpreter.run(ops, &mut persist, &mut present);
    }

    #[test]
    fn test_move_scale_rotate_compose_on_top() {
        let mut interpreter = Interpreter::new(small_config()).unwrap();
        let ops = [
            Operation::Move { offset: vector![10.0, 0.0, 0.0] },
            Operation::Scale { factors: vector![2.0, 2.0, 2.0] },
            Operation::Rotate { axis: Axis::Z, degrees: 90.0 },
        ];
        run(&mut interpreter, &ops).unwrap();
        assert_eq!(interpreter.frames().depth(), 1);
        let p = interpreter.frames().peek().transform_point(&point![1.0, 0.0, 0.0]);
        assert!((p - point![10.0, 2.0, 0.0]).norm() < 1e-9);
    }

    #[test]
    fn test_balanced_push_pop_is_identity() {
        let mut interpreter = Interpreter::new(small_config()).unwrap();
        let ops = [
            Operation::Push,
            Operation::Push,
            Operation::Pop,
            Operation::Push,
            Operation::Pop,
            Operation::Pop,
        ];
        run(&mut interpreter, &ops).unwrap();
        assert_eq!(*interpreter.frames().peek(), Matrix4::identity());
    }

    #[test]
    fn test_unbalanced_pop_aborts_pass() {
        let mut interpreter = Interpreter::new(small_config()).unwrap();
        let ops = [
            Operation::Push,
            Operation::Pop,
            Operation::Pop,
            Operation::Box { corner_0: point![0.0, 0.0, 0.0], corner_1: point![10.0, 10.0, 10.0] },
        ];
        let err = run(&mut interpreter, &ops).unwrap_err();
        assert!(matches!(err, RenderError::StackUnderflow));
        // Nothing after the failing pop ran.
        assert_eq!(interpreter.pixels().get_pixel(5, 5), Some(Color::default()));
    }

    #[test]
    fn test_solids_are_drawn_in_the_current_frame() {
        let mut interpreter = Interpreter::new(small_config()).unwrap();
        let ops = [
            Operation::Push,
            Operation::Move { offset: vector![50.0, 50.0, 0.0] },
            Operation::Box { corner_0: point![0.0, 0.0, 0.0], corner_1: point![10.0, 10.0, 10.0] },
            Operation::Pop,
        ];
        let stats = run(&mut interpreter, &ops).unwrap();
        assert_eq!(stats.drawn, 2);
        assert_ne!(interpreter.pixels().get_pixel(55, 55), Some(Color::default()));
        assert_eq!(interpreter.pixels().get_pixel(5, 5), Some(Color::default()));
        assert_eq!(interpreter.depth().get(55, 55), 10.0);
    }

    #[test]
    fn test_scratch_matrix_is_reused() {
        let mut interpreter = Interpreter::new(small_config()).unwrap();
        let ops = [
            Operation::Sphere { center: point![50.0, 50.0, 0.0], radius: 20.0 },
            Operation::Torus {
                center: point![50.0, 50.0, 0.0],
                inner_radius: 5.0,
                outer_radius: 30.0,
            },
            Operation::Line { p0: point![0.0, 0.0, 0.0], p1: point![99.0, 0.0, 0.0] },
        ];
        run(&mut interpreter, &ops).unwrap();
        assert!(interpreter.scratch.is_empty());
        assert_eq!(interpreter.pixels().get_pixel(99, 0), Some(Color { r: 255, g: 255, b: 255 }));
    }

    #[test]
    fn test_capacity_limit_is_fatal() {
        let config = RenderConfig {
            initial_columns: 10,
            max_columns: 100,
            ..small_config()
        };
        let mut interpreter = Interpreter::new(config).unwrap();
        let ops = [Operation::Sphere { center: point![50.0, 50.0, 0.0], radius: 20.0 }];
        let err = run(&mut interpreter, &ops).unwrap_err();
        assert!(matches!(err, RenderError::BufferCapacityExceeded { limit: 100, .. }));
    }

    #[test]
    fn test_save_and_display_reach_collaborators() {
        let mut interpreter = Interpreter::new(small_config()).unwrap();
        let mut persist = Counter::default();
        let mut present = Counter::default();
        let ops = [
            Operation::Display,
            Operation::Save { name: "a.png".to_string() },
            Operation::Save { name: "b.ppm".to_string() },
        ];
        interpreter.run(&ops, &mut persist, &mut present).unwrap();
        assert_eq!(persist.saves, vec!["a.png", "b.ppm"]);
        assert_eq!(present.displays, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RenderConfig { step: 0, ..small_config() };
        assert!(matches!(Interpreter::new(config), Err(RenderError::InvalidConfig(_))));
    }
}
