use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::gesture::{GestureEvent, HitTest, MoveCommand, ReorderEffect, TouchId};
use crate::domain::item::ItemId;
use crate::domain::ranking::DropSide;
use crate::domain::{DomainError, DomainResult};

/// Default hold time before a touch becomes a drag
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(400);

/// Which input modalities are wired to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modalities {
    pub pointer: bool,
    pub touch: bool,
}

impl Default for Modalities {
    fn default() -> Self {
        Self {
            pointer: true,
            touch: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderConfig {
    pub modalities: Modalities,
    pub long_press: Duration,
    /// Reorder continuously under the finger instead of once at release
    pub live_reorder: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            modalities: Modalities::default(),
            long_press: DEFAULT_LONG_PRESS,
            live_reorder: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReorderState {
    Idle,
    PointerDragging {
        source: ItemId,
    },
    TouchPending {
        touch: TouchId,
        source: ItemId,
        deadline: Instant,
    },
    TouchDragging {
        touch: TouchId,
        source: ItemId,
        /// Last target sampled under the finger
        hovered: Option<(ItemId, DropSide)>,
        live_moves: usize,
    },
}

/// Converts pointer and touch events into move commands.
///
/// Pure: it never touches the ranking. Time comes in through `now` so the
/// long-press timer is a deadline the driver polls, not a thread.
#[derive(Debug)]
pub struct ReorderMachine {
    config: ReorderConfig,
    state: ReorderState,
}

impl ReorderMachine {
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            config,
            state: ReorderState::Idle,
        }
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    pub fn state(&self) -> &ReorderState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ReorderState::Idle)
    }

    /// When the pending long press fires, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ReorderState::TouchPending { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Fire the long-press timer if it is due.
    pub fn poll(&mut self, now: Instant) -> Vec<ReorderEffect> {
        let (touch, source) = match &self.state {
            ReorderState::TouchPending {
                touch,
                source,
                deadline,
            } if now >= *deadline => (*touch, source.clone()),
            _ => return Vec::new(),
        };

        debug!("long press on {} recognised, touch drag started", source);
        self.state = ReorderState::TouchDragging {
            touch,
            source: source.clone(),
            hovered: None,
            live_moves: 0,
        };
        vec![ReorderEffect::Acknowledge, ReorderEffect::Lift { source }]
    }

    /// Feed one event.
    ///
    /// Returns `InvalidGesture` for events that make no sense in the current
    /// state. Nothing has been committed when that happens; the caller
    /// `reset`s the machine, which releases a lifted source.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        now: Instant,
        layout: &dyn HitTest,
    ) -> DomainResult<Vec<ReorderEffect>> {
        match event {
            GestureEvent::DragStart { source } => self.on_drag_start(source),
            GestureEvent::DragOver { target } => Ok(self.on_drag_over(target)),
            GestureEvent::Drop { target, side } => self.on_drop(target, side),
            GestureEvent::DragEnd => Ok(self.on_drag_end()),
            GestureEvent::TouchStart { touch, source } => {
                let mut effects = self.poll(now);
                effects.extend(self.on_touch_start(touch, source, now));
                Ok(effects)
            }
            GestureEvent::TouchMove { touch, point } => {
                let mut effects = self.poll(now);
                let target = layout
                    .element_at(point)
                    .map(|bounds| {
                        let side = bounds.side_of(point.y);
                        (bounds.id, side)
                    });
                effects.extend(self.on_touch_move(touch, target));
                Ok(effects)
            }
            GestureEvent::TouchEnd { touch } | GestureEvent::TouchCancel { touch } => {
                let mut effects = self.poll(now);
                effects.extend(self.on_touch_finish(touch));
                Ok(effects)
            }
        }
    }

    /// Abandon whatever gesture is in flight without committing.
    pub fn reset(&mut self) -> Vec<ReorderEffect> {
        let was_lifted = matches!(
            self.state,
            ReorderState::PointerDragging { .. } | ReorderState::TouchDragging { .. }
        );
        self.state = ReorderState::Idle;
        if was_lifted {
            vec![ReorderEffect::Release]
        } else {
            Vec::new()
        }
    }

    // ========================================================================
    // POINTER
    // ========================================================================

    fn on_drag_start(&mut self, source: ItemId) -> DomainResult<Vec<ReorderEffect>> {
        if !self.config.modalities.pointer {
            return Ok(Vec::new());
        }
        match self.state {
            ReorderState::Idle => {
                debug!("pointer drag started on {}", source);
                self.state = ReorderState::PointerDragging {
                    source: source.clone(),
                };
                Ok(vec![ReorderEffect::Lift { source }])
            }
            ReorderState::PointerDragging { .. } => {
                Err(DomainError::InvalidGesture(
                    "drag started while another drag is active".to_string(),
                ))
            }
            // A touch gesture owns the machine
            _ => Ok(Vec::new()),
        }
    }

    fn on_drag_over(&mut self, target: ItemId) -> Vec<ReorderEffect> {
        match &self.state {
            ReorderState::PointerDragging { source } if *source != target => {
                vec![ReorderEffect::DropAllowed { target }]
            }
            _ => Vec::new(),
        }
    }

    fn on_drop(&mut self, target: ItemId, side: Option<DropSide>) -> DomainResult<Vec<ReorderEffect>> {
        if !self.config.modalities.pointer {
            return Ok(Vec::new());
        }
        match std::mem::replace(&mut self.state, ReorderState::Idle) {
            ReorderState::PointerDragging { source } => {
                let mut effects = Vec::new();
                if source != target {
                    let side = side.unwrap_or(DropSide::Before);
                    debug!("pointer drop: {} {:?} {}", source, side, target);
                    effects.push(ReorderEffect::Move(MoveCommand {
                        source,
                        target,
                        side,
                        live: false,
                    }));
                }
                effects.push(ReorderEffect::Release);
                Ok(effects)
            }
            ReorderState::Idle => Err(DomainError::InvalidGesture(
                "drop without a recorded drag source".to_string(),
            )),
            touch_state => {
                // Drops do not belong to touch gestures
                self.state = touch_state;
                Ok(Vec::new())
            }
        }
    }

    fn on_drag_end(&mut self) -> Vec<ReorderEffect> {
        match self.state {
            ReorderState::PointerDragging { .. } => {
                debug!("pointer drag ended without drop");
                self.state = ReorderState::Idle;
                vec![ReorderEffect::Release]
            }
            _ => Vec::new(),
        }
    }

    // ========================================================================
    // TOUCH
    // ========================================================================

    fn on_touch_start(&mut self, touch: TouchId, source: ItemId, now: Instant) -> Vec<ReorderEffect> {
        if !self.config.modalities.touch {
            return Vec::new();
        }
        match self.state {
            ReorderState::Idle => {
                debug!("touch {} armed long press on {}", touch, source);
                self.state = ReorderState::TouchPending {
                    touch,
                    source,
                    deadline: now + self.config.long_press,
                };
            }
            ReorderState::TouchPending { .. } => {
                debug!("competing touch {} cancelled pending long press", touch);
                self.state = ReorderState::Idle;
            }
            // Only the first active touch drives a drag
            _ => {}
        }
        Vec::new()
    }

    fn on_touch_move(&mut self, touch: TouchId, target: Option<(ItemId, DropSide)>) -> Vec<ReorderEffect> {
        let pending_here = matches!(
            &self.state,
            ReorderState::TouchPending { touch: active, .. } if *active == touch
        );
        if pending_here {
            debug!("touch {} moved before long press, treated as scroll", touch);
            self.state = ReorderState::Idle;
            return Vec::new();
        }

        let live = self.config.live_reorder;
        let ReorderState::TouchDragging {
            touch: active,
            source,
            hovered,
            live_moves,
        } = &mut self.state
        else {
            return Vec::new();
        };
        if *active != touch {
            return Vec::new();
        }
        // Off the list or back over the source: nothing to drop onto
        let Some((target, side)) = target.filter(|(target, _)| *target != *source) else {
            *hovered = None;
            return Vec::new();
        };

        let sample = Some((target.clone(), side));
        if *hovered == sample {
            return Vec::new();
        }
        *hovered = sample;
        if !live {
            return Vec::new();
        }

        *live_moves += 1;
        vec![ReorderEffect::Move(MoveCommand {
            source: source.clone(),
            target,
            side,
            live: true,
        })]
    }

    fn on_touch_finish(&mut self, touch: TouchId) -> Vec<ReorderEffect> {
        let owns_gesture = match &self.state {
            ReorderState::TouchPending { touch: active, .. }
            | ReorderState::TouchDragging { touch: active, .. } => *active == touch,
            _ => false,
        };
        if !owns_gesture {
            return Vec::new();
        }

        match std::mem::replace(&mut self.state, ReorderState::Idle) {
            ReorderState::TouchDragging {
                source,
                hovered,
                live_moves,
                ..
            } => {
                let mut effects = Vec::new();
                if self.config.live_reorder {
                    if live_moves > 0 {
                        effects.push(ReorderEffect::Settle { source });
                    }
                } else if let Some((target, side)) = hovered {
                    effects.push(ReorderEffect::Move(MoveCommand {
                        source,
                        target,
                        side,
                        live: false,
                    }));
                }
                debug!("touch {} drag finished", touch);
                effects.push(ReorderEffect::Release);
                effects
            }
            // Released before the long press fired: a tap
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reorder::{ElementBounds, NoHits, Point};

    /// Rows of height 50 stacked from y = 0, in id order
    struct Rows(Vec<i64>);

    impl HitTest for Rows {
        fn element_at(&self, point: Point) -> Option<ElementBounds> {
            if point.y < 0.0 {
                return None;
            }
            let index = (point.y / 50.0) as usize;
            self.0.get(index).map(|id| ElementBounds {
                id: ItemId::Int(*id),
                top: index as f64 * 50.0,
                height: 50.0,
            })
        }
    }

    fn id(n: i64) -> ItemId {
        ItemId::Int(n)
    }

    fn machine(live_reorder: bool) -> ReorderMachine {
        ReorderMachine::new(ReorderConfig {
            live_reorder,
            ..ReorderConfig::default()
        })
    }

    fn moves(effects: &[ReorderEffect]) -> Vec<&MoveCommand> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                ReorderEffect::Move(command) => Some(command),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_pointer_drop_commits_once() {
        let mut m = machine(true);
        let now = Instant::now();
        m.handle(GestureEvent::DragStart { source: id(1) }, now, &NoHits).unwrap();
        let over = m.handle(GestureEvent::DragOver { target: id(3) }, now, &NoHits).unwrap();
        assert_eq!(over, vec![ReorderEffect::DropAllowed { target: id(3) }]);

        let effects = m
            .handle(GestureEvent::Drop { target: id(3), side: None }, now, &NoHits)
            .unwrap();
        assert_eq!(
            moves(&effects),
            vec![&MoveCommand {
                source: id(1),
                target: id(3),
                side: DropSide::Before,
                live: false,
            }]
        );
        assert!(m.is_idle());
        assert!(m.handle(GestureEvent::DragEnd, now, &NoHits).unwrap().is_empty());
    }

    #[test]
    fn test_pointer_drop_on_source_is_no_commit() {
        let mut m = machine(true);
        let now = Instant::now();
        m.handle(GestureEvent::DragStart { source: id(2) }, now, &NoHits).unwrap();
        let effects = m
            .handle(GestureEvent::Drop { target: id(2), side: Some(DropSide::After) }, now, &NoHits)
            .unwrap();
        assert_eq!(effects, vec![ReorderEffect::Release]);
        assert!(m.is_idle());
    }

    #[test]
    fn test_drag_end_without_drop_releases() {
        let mut m = machine(true);
        let now = Instant::now();
        m.handle(GestureEvent::DragStart { source: id(2) }, now, &NoHits).unwrap();
        let effects = m.handle(GestureEvent::DragEnd, now, &NoHits).unwrap();
        assert_eq!(effects, vec![ReorderEffect::Release]);
        assert!(m.is_idle());
    }

    #[test]
    fn test_second_drag_start_is_invalid_and_reset_releases() {
        let mut m = machine(true);
        let now = Instant::now();
        m.handle(GestureEvent::DragStart { source: id(1) }, now, &NoHits).unwrap();
        let result = m.handle(GestureEvent::DragStart { source: id(2) }, now, &NoHits);
        assert!(matches!(result, Err(DomainError::InvalidGesture(_))));

        assert_eq!(m.reset(), vec![ReorderEffect::Release]);
        assert!(m.is_idle());
    }

    #[test]
    fn test_drop_without_source_is_invalid() {
        let mut m = machine(true);
        let result = m.handle(
            GestureEvent::Drop { target: id(1), side: None },
            Instant::now(),
            &NoHits,
        );
        assert!(matches!(result, Err(DomainError::InvalidGesture(_))));
        assert!(m.is_idle());
    }

    #[test]
    fn test_touch_move_before_long_press_is_scroll() {
        let mut m = machine(true);
        let rows = Rows(vec![1, 2, 3]);
        let t0 = Instant::now();
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &rows).unwrap();
        assert!(m.deadline().is_some());

        let early = t0 + Duration::from_millis(100);
        let effects = m
            .handle(GestureEvent::TouchMove { touch: 1, point: Point::new(10.0, 140.0) }, early, &rows)
            .unwrap();
        assert!(effects.is_empty());
        assert!(m.is_idle());
    }

    #[test]
    fn test_competing_touch_cancels_pending() {
        let mut m = machine(true);
        let rows = Rows(vec![1, 2]);
        let t0 = Instant::now();
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &rows).unwrap();
        m.handle(GestureEvent::TouchStart { touch: 2, source: id(2) }, t0, &rows).unwrap();
        assert!(m.is_idle());
        assert!(m.poll(t0 + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_long_press_fires_acknowledgement() {
        let mut m = machine(true);
        let t0 = Instant::now();
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &NoHits).unwrap();
        assert!(m.poll(t0 + Duration::from_millis(399)).is_empty());
        let effects = m.poll(t0 + DEFAULT_LONG_PRESS);
        assert_eq!(
            effects,
            vec![ReorderEffect::Acknowledge, ReorderEffect::Lift { source: id(1) }]
        );
        assert!(matches!(m.state(), ReorderState::TouchDragging { .. }));
    }

    #[test]
    fn test_live_touch_drag_moves_then_settles() {
        let mut m = machine(true);
        let rows = Rows(vec![1, 2, 3]);
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(500);
        m.handle(GestureEvent::TouchStart { touch: 7, source: id(1) }, t0, &rows).unwrap();

        // Timer fires lazily on the first move after the deadline
        let effects = m
            .handle(GestureEvent::TouchMove { touch: 7, point: Point::new(5.0, 140.0) }, later, &rows)
            .unwrap();
        assert_eq!(effects[0], ReorderEffect::Acknowledge);
        assert_eq!(
            moves(&effects),
            vec![&MoveCommand {
                source: id(1),
                target: id(3),
                side: DropSide::After,
                live: true,
            }]
        );

        // Same sample again does not repeat the move
        let repeat = m
            .handle(GestureEvent::TouchMove { touch: 7, point: Point::new(5.0, 141.0) }, later, &rows)
            .unwrap();
        assert!(repeat.is_empty());

        let end = m.handle(GestureEvent::TouchEnd { touch: 7 }, later, &rows).unwrap();
        assert_eq!(
            end,
            vec![ReorderEffect::Settle { source: id(1) }, ReorderEffect::Release]
        );
        assert!(m.is_idle());
    }

    #[test]
    fn test_commit_once_uses_position_at_release() {
        let mut m = machine(false);
        let rows = Rows(vec![1, 2, 3]);
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(450);
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(3) }, t0, &rows).unwrap();
        m.poll(later);

        for y in [60.0, 10.0] {
            let effects = m
                .handle(GestureEvent::TouchMove { touch: 1, point: Point::new(0.0, y) }, later, &rows)
                .unwrap();
            assert!(moves(&effects).is_empty());
        }

        let end = m.handle(GestureEvent::TouchCancel { touch: 1 }, later, &rows).unwrap();
        assert_eq!(
            moves(&end),
            vec![&MoveCommand {
                source: id(3),
                target: id(1),
                side: DropSide::Before,
                live: false,
            }]
        );
    }

    #[test]
    fn test_commit_once_release_over_source_commits_nothing() {
        let mut m = machine(false);
        let rows = Rows(vec![1, 2, 3]);
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(450);
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(3) }, t0, &rows).unwrap();
        m.poll(later);

        // Over row 1, then back over the source row
        for y in [10.0, 120.0] {
            m.handle(GestureEvent::TouchMove { touch: 1, point: Point::new(0.0, y) }, later, &rows)
                .unwrap();
        }

        let end = m.handle(GestureEvent::TouchEnd { touch: 1 }, later, &rows).unwrap();
        assert_eq!(end, vec![ReorderEffect::Release]);
        assert!(m.is_idle());
    }

    #[test]
    fn test_commit_once_release_off_list_commits_nothing() {
        let mut m = machine(false);
        let rows = Rows(vec![1, 2, 3]);
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(450);
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(3) }, t0, &rows).unwrap();
        m.poll(later);

        for y in [60.0, -20.0] {
            m.handle(GestureEvent::TouchMove { touch: 1, point: Point::new(0.0, y) }, later, &rows)
                .unwrap();
        }

        let end = m.handle(GestureEvent::TouchEnd { touch: 1 }, later, &rows).unwrap();
        assert_eq!(end, vec![ReorderEffect::Release]);
    }

    #[test]
    fn test_touch_drag_over_source_only_commits_nothing() {
        let mut m = machine(true);
        let rows = Rows(vec![1, 2]);
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(400);
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &rows).unwrap();
        m.handle(GestureEvent::TouchMove { touch: 1, point: Point::new(0.0, 20.0) }, later, &rows)
            .unwrap();
        let end = m.handle(GestureEvent::TouchEnd { touch: 1 }, later, &rows).unwrap();
        assert_eq!(end, vec![ReorderEffect::Release]);
    }

    #[test]
    fn test_second_touch_ignored_while_dragging() {
        let mut m = machine(true);
        let rows = Rows(vec![1, 2, 3]);
        let t0 = Instant::now();
        let later = t0 + Duration::from_millis(400);
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &rows).unwrap();
        m.poll(later);

        m.handle(GestureEvent::TouchStart { touch: 2, source: id(2) }, later, &rows).unwrap();
        let foreign = m
            .handle(GestureEvent::TouchMove { touch: 2, point: Point::new(0.0, 120.0) }, later, &rows)
            .unwrap();
        assert!(foreign.is_empty());
        assert!(m.handle(GestureEvent::TouchEnd { touch: 2 }, later, &rows).unwrap().is_empty());
        assert!(matches!(m.state(), ReorderState::TouchDragging { .. }));
    }

    #[test]
    fn test_tap_releases_without_effects() {
        let mut m = machine(true);
        let t0 = Instant::now();
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &NoHits).unwrap();
        let effects = m
            .handle(GestureEvent::TouchEnd { touch: 1 }, t0 + Duration::from_millis(50), &NoHits)
            .unwrap();
        assert!(effects.is_empty());
        assert!(m.is_idle());
    }

    #[test]
    fn test_disabled_modalities_are_ignored() {
        let mut m = ReorderMachine::new(ReorderConfig {
            modalities: Modalities {
                pointer: false,
                touch: true,
            },
            ..ReorderConfig::default()
        });
        let now = Instant::now();
        assert!(m.handle(GestureEvent::DragStart { source: id(1) }, now, &NoHits).unwrap().is_empty());
        assert!(m.is_idle());
    }

    #[test]
    fn test_pointer_ignored_during_touch_drag() {
        let mut m = machine(true);
        let t0 = Instant::now();
        m.handle(GestureEvent::TouchStart { touch: 1, source: id(1) }, t0, &NoHits).unwrap();
        m.poll(t0 + DEFAULT_LONG_PRESS);
        assert!(m.handle(GestureEvent::DragStart { source: id(2) }, t0, &NoHits).unwrap().is_empty());
        assert!(m
            .handle(GestureEvent::Drop { target: id(2), side: None }, t0, &NoHits)
            .unwrap()
            .is_empty());
        assert!(matches!(m.state(), ReorderState::TouchDragging { .. }));
    }
}
