//! The simulation driver.
//!
//! A [`Simulation`] owns one node per input entity and a [`ForceField`]. It
//! advances in discrete steps while a scalar temperature `alpha` decays
//! geometrically from its start value toward `alpha_min`:
//!
//! 1. every force reads the same node snapshot and adds velocity deltas;
//! 2. each velocity becomes `(v + Σdeltas) * (1 - velocity_decay)`;
//! 3. each position advances by its new velocity;
//! 4. `alpha *= 1 - alpha_decay`;
//! 5. observers receive a [`Tick`];
//! 6. the run ends once `alpha < alpha_min`.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --first step--> Running --alpha < alpha_min--> Converged
//! ```
//!
//! Node positions are placed on a phyllotaxis spiral around the canvas center
//! (or taken from [`Simulation::warm_start`]) on the first step. A run that an
//! observer cancels stays `Running` and can be resumed; a converged
//! simulation rejects further steps.
//!
//! A step that fails leaves every node exactly as it was before the step.

use std::{f64::consts::PI, fmt, ops::ControlFlow};

use log::{debug, info, trace, warn};
use rand::{SeedableRng, rngs::StdRng};

use corral_core::geometry::Point;

use crate::{
    config::LayoutConfig,
    entity::Entity,
    error::CorralError,
    layout::{ForceContext, ForceField, Node},
};

const INITIAL_RADIUS: f64 = 10.0;

/// Where a [`Simulation`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Uninitialized,
    Running,
    Converged,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Converged => "converged",
        };
        f.write_str(name)
    }
}

/// Why [`Simulation::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// `alpha` fell below `alpha_min`.
    Converged,
    /// An observer asked to stop. The simulation can be resumed.
    Cancelled,
}

/// The result of a single [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    Converged,
}

/// The state delivered to observers after each step.
#[derive(Debug, Clone, Copy)]
pub struct Tick<'a> {
    step: usize,
    alpha: f64,
    nodes: &'a [Node],
}

impl<'a> Tick<'a> {
    /// Returns the 1-based number of the step just completed
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the temperature after this step's decay
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }
}

/// Receives the node positions after every step.
///
/// Returning [`ControlFlow::Break`] stops the run before the next step.
pub trait TickObserver {
    fn on_tick(&mut self, tick: &Tick<'_>) -> ControlFlow<()>;
}

struct FnObserver<F>(F);

impl<F> TickObserver for FnObserver<F>
where
    F: FnMut(&Tick<'_>) -> ControlFlow<()>,
{
    fn on_tick(&mut self, tick: &Tick<'_>) -> ControlFlow<()> {
        (self.0)(tick)
    }
}

/// A force-directed layout of non-overlapping circles.
///
/// # Examples
///
/// ```
/// # use corral::{config::LayoutConfig, entity::Entity, simulation::Simulation};
/// let entities = vec![Entity::new(1, 10.0), Entity::new(2, 12.0)];
/// let mut simulation = Simulation::new(entities, &LayoutConfig::default())?;
/// let nodes = simulation.run_to_convergence()?;
/// assert_eq!(nodes.len(), 2);
/// # Ok::<(), corral::CorralError>(())
/// ```
#[derive(Debug)]
pub struct Simulation {
    nodes: Vec<Node>,
    forces: ForceField,
    center: Point,
    warm_positions: Option<Vec<Point>>,

    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    velocity_decay: f64,

    state: SimulationState,
    step_count: usize,
    rng: StdRng,
}

impl Simulation {
    /// Creates a simulation with the standard force field for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] for an invalid configuration and
    /// [`CorralError::Validation`] naming the first malformed entity. No
    /// simulation is created in either case.
    pub fn new(entities: Vec<Entity>, config: &LayoutConfig) -> Result<Self, CorralError> {
        config.validate()?;
        for (index, entity) in entities.iter().enumerate() {
            entity.validate(index)?;
        }
        let forces = ForceField::from_config(config)?;

        debug!(
            nodes = entities.len(),
            alpha_min = config.alpha_min(),
            alpha_decay = config.alpha_decay(),
            seed = config.seed();
            "Simulation created"
        );

        Ok(Self {
            nodes: entities.into_iter().map(Node::new).collect(),
            forces,
            center: config.center(),
            warm_positions: None,
            alpha: 1.0,
            alpha_min: config.alpha_min(),
            alpha_decay: config.alpha_decay(),
            velocity_decay: config.velocity_decay(),
            state: SimulationState::Uninitialized,
            step_count: 0,
            rng: StdRng::seed_from_u64(config.seed()),
        })
    }

    /// Replaces the force field.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::InvalidState`] once the simulation has stepped.
    pub fn set_force_field(&mut self, forces: ForceField) -> Result<(), CorralError> {
        self.require_uninitialized("replace the force field")?;
        self.forces = forces;
        Ok(())
    }

    /// Returns the force field
    pub fn force_field(&self) -> &ForceField {
        &self.forces
    }

    /// Seeds the initial positions instead of the phyllotaxis spiral.
    ///
    /// Re-running with the previous result as warm start and a low
    /// [`warm_start_alpha`](Self::warm_start_alpha) converges quickly.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::InvalidState`] once the simulation has stepped,
    /// and [`CorralError::Validation`] if the number of positions differs from
    /// the number of entities or a coordinate is not finite.
    pub fn warm_start(&mut self, positions: &[Point]) -> Result<(), CorralError> {
        self.require_uninitialized("warm start")?;
        if positions.len() != self.nodes.len() {
            return Err(CorralError::validation(
                positions.len().min(self.nodes.len()),
                format!(
                    "warm start has {} positions for {} entities",
                    positions.len(),
                    self.nodes.len()
                ),
            ));
        }
        if let Some(index) = positions.iter().position(|p| !p.is_finite()) {
            return Err(CorralError::validation(
                index,
                "warm start position must be finite",
            ));
        }

        self.warm_positions = Some(positions.to_vec());
        Ok(())
    }

    /// Sets the starting temperature, `1.0` by default.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::InvalidState`] once the simulation has stepped,
    /// and [`CorralError::Config`] if `alpha` is not in `(0, 1]`.
    pub fn warm_start_alpha(&mut self, alpha: f64) -> Result<(), CorralError> {
        self.require_uninitialized("set the starting alpha")?;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(CorralError::Config(format!(
                "starting alpha must be in (0, 1], got {alpha}"
            )));
        }
        self.alpha = alpha;
        Ok(())
    }

    /// Runs until convergence or until `observer` breaks.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::InvalidState`] if the simulation has already
    /// converged, or the first error raised by a step. Observers receive no
    /// tick for a failed step.
    pub fn run<O>(&mut self, observer: &mut O) -> Result<TerminationReason, CorralError>
    where
        O: TickObserver + ?Sized,
    {
        if self.state == SimulationState::Converged {
            return Err(CorralError::InvalidState {
                operation: "run",
                state: self.state,
            });
        }

        info!(
            nodes = self.nodes.len(),
            forces = self.forces.len(),
            alpha = self.alpha;
            "Running simulation"
        );

        loop {
            let outcome = self.step()?;
            let tick = Tick {
                step: self.step_count,
                alpha: self.alpha,
                nodes: &self.nodes,
            };
            let flow = observer.on_tick(&tick);

            if outcome == StepOutcome::Converged {
                info!(steps = self.step_count, alpha = self.alpha; "Simulation converged");
                return Ok(TerminationReason::Converged);
            }
            if flow.is_break() {
                warn!(steps = self.step_count, alpha = self.alpha; "Simulation cancelled");
                return Ok(TerminationReason::Cancelled);
            }
        }
    }

    /// Runs with a closure as the observer.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with<F>(&mut self, on_tick: F) -> Result<TerminationReason, CorralError>
    where
        F: FnMut(&Tick<'_>) -> ControlFlow<()>,
    {
        self.run(&mut FnObserver(on_tick))
    }

    /// Runs to convergence without an observer and returns the final nodes.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_to_convergence(&mut self) -> Result<&[Node], CorralError> {
        self.run_with(|_| ControlFlow::Continue(()))?;
        Ok(&self.nodes)
    }

    /// Advances the simulation by exactly one step.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::InvalidState`] if the simulation has converged,
    /// a [`CorralError::Lookup`] raised by a force, or
    /// [`CorralError::NumericInstability`] if any velocity or position would
    /// become non-finite. Nothing is committed when an error is returned.
    pub fn step(&mut self) -> Result<StepOutcome, CorralError> {
        let placed = match self.state {
            SimulationState::Converged => {
                return Err(CorralError::InvalidState {
                    operation: "step",
                    state: self.state,
                });
            }
            SimulationState::Uninitialized => Some(self.initial_nodes()),
            SimulationState::Running => None,
        };
        let snapshot = placed.as_deref().unwrap_or(&self.nodes);

        let step = self.step_count + 1;
        let mut rng = self.rng.clone();
        let mut deltas = vec![Point::default(); snapshot.len()];
        if !snapshot.is_empty() {
            for (name, force) in self.forces.iter() {
                let mut ctx = ForceContext::new(name, snapshot, self.alpha, &mut rng);
                force.apply(&mut ctx, &mut deltas)?;

                if let Some(index) = deltas.iter().position(|delta| !delta.is_finite()) {
                    return Err(CorralError::NumericInstability {
                        index,
                        force: name.to_string(),
                        step,
                    });
                }
            }
        }

        let friction = 1.0 - self.velocity_decay;
        let mut next = Vec::with_capacity(snapshot.len());
        for (index, (node, delta)) in snapshot.iter().zip(&deltas).enumerate() {
            let velocity = node.velocity().add_point(*delta).scale(friction);
            let position = node.position().add_point(velocity);
            if !position.is_finite() || !velocity.is_finite() {
                return Err(CorralError::NumericInstability {
                    index,
                    force: "integration".to_string(),
                    step,
                });
            }
            next.push((position, velocity));
        }

        if let Some(placed) = placed {
            self.nodes = placed;
            self.warm_positions = None;
            self.state = SimulationState::Running;
            debug!(
                nodes = self.nodes.len(),
                alpha = self.alpha,
                expected_steps = self.expected_steps();
                "Nodes placed"
            );
        }
        for (node, (position, velocity)) in self.nodes.iter_mut().zip(next) {
            node.advance(position, velocity);
        }
        self.rng = rng;
        self.alpha *= 1.0 - self.alpha_decay;
        self.step_count = step;
        trace!(step, alpha = self.alpha; "Step completed");

        if self.alpha < self.alpha_min {
            self.state = SimulationState::Converged;
            Ok(StepOutcome::Converged)
        } else {
            Ok(StepOutcome::Running)
        }
    }

    /// Returns the node state.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::InvalidState`] before the first step, when no
    /// position has been assigned yet.
    pub fn nodes(&self) -> Result<&[Node], CorralError> {
        if self.state == SimulationState::Uninitialized {
            return Err(CorralError::InvalidState {
                operation: "read node positions",
                state: self.state,
            });
        }
        Ok(&self.nodes)
    }

    /// Returns the number of steps left before convergence.
    ///
    /// Counts by replaying the decay, so the result matches what
    /// [`run`](Self::run) will do from here exactly.
    pub fn expected_steps(&self) -> usize {
        if self.state == SimulationState::Converged {
            return 0;
        }
        let mut alpha = self.alpha;
        let mut steps = 0;
        loop {
            alpha *= 1.0 - self.alpha_decay;
            steps += 1;
            if alpha < self.alpha_min {
                return steps;
            }
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    pub fn alpha_decay(&self) -> f64 {
        self.alpha_decay
    }

    pub fn velocity_decay(&self) -> f64 {
        self.velocity_decay
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Returns the number of completed steps
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the number of nodes, available in every state
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn require_uninitialized(&self, operation: &'static str) -> Result<(), CorralError> {
        if self.state != SimulationState::Uninitialized {
            return Err(CorralError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Nodes at their starting positions, either warm-start or spiral.
    fn initial_nodes(&self) -> Vec<Node> {
        let mut nodes = self.nodes.clone();
        for (index, node) in nodes.iter_mut().enumerate() {
            let position = match &self.warm_positions {
                Some(positions) => positions[index],
                None => phyllotaxis(self.center, index),
            };
            node.place(position);
        }
        nodes
    }
}

/// Position of the `index`-th node on a sunflower spiral around `center`.
fn phyllotaxis(center: Point, index: usize) -> Point {
    let angle_step = PI * (3.0 - 5.0_f64.sqrt());
    let i = index as f64;
    let radius = INITIAL_RADIUS * (0.5 + i).sqrt();
    let angle = i * angle_step;
    center.add_point(Point::new(radius * angle.cos(), radius * angle.sin()))
}
