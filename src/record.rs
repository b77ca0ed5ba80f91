use serde::Serialize;

/// Records contributed by several passes and merged by sprite identifier.
pub trait Record: Clone {
    fn id(&self) -> u32;

    fn with_id(id: u32) -> Self;

    /// Overlay every field present in `other` onto `self` (last write wins).
    fn merge_from(&mut self, other: Self);

    /// True when no data field is set.
    fn is_empty(&self) -> bool;
}

fn is_false(v: &Option<bool>) -> bool {
    !matches!(v, Some(true))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_offset: Option<i64>,
    #[serde(skip_serializing_if = "is_false")]
    pub cut_negative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_sprite: Option<u32>,
    #[serde(skip_serializing_if = "is_false")]
    pub door: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mov: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yadd: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<i64>,
    #[serde(skip_serializing_if = "is_false")]
    pub no_lighting: Option<bool>,
}

impl MetadataRecord {
    /// `cut_offset` and `cut_sprite` are exclusive; setting one clears the other.
    pub fn set_cut_offset(&mut self, offset: i64, negative: bool) {
        self.cut_offset = Some(offset);
        self.cut_negative = negative.then_some(true);
        self.cut_sprite = None;
    }

    pub fn set_cut_sprite(&mut self, sprite: u32) {
        self.cut_offset = None;
        self.cut_negative = None;
        self.cut_sprite = Some(sprite);
    }

    pub fn has_cut(&self) -> bool {
        self.cut_offset.is_some() || self.cut_sprite.is_some()
    }

    pub fn has_offset(&self) -> bool {
        self.offset_x.is_some() || self.offset_y.is_some()
    }
}

macro_rules! overlay {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

impl Record for MetadataRecord {
    fn id(&self) -> u32 {
        self.id
    }

    fn with_id(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn merge_from(&mut self, other: Self) {
        if other.has_cut() {
            self.cut_offset = other.cut_offset;
            self.cut_negative = other.cut_negative;
            self.cut_sprite = other.cut_sprite;
        }
        overlay!(self, other, door, mov, yadd, layer, offset_x, offset_y, no_lighting);
    }

    fn is_empty(&self) -> bool {
        !self.has_cut()
            && self.door.is_none()
            && self.mov.is_none()
            && self.yadd.is_none()
            && self.layer.is_none()
            && !self.has_offset()
            && self.no_lighting.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    C1,
    C2,
    C3,
}

impl ColorChannel {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "c1" => Some(Self::C1),
            "c2" => Some(Self::C2),
            "c3" => Some(Self::C3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Animation {
    /// Frame `base + (tick / divisor) % frames`.
    Cycle { frames: u32, divisor: u32 },
    /// As `Cycle`, with the map position mixed into the frame index.
    PositionCycle { frames: u32, divisor: u32 },
    /// A channel oscillating on a tick mask of `period - 1`.
    Pulse {
        period: u32,
        affects: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        base: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        amplitude: Option<i64>,
    },
}

impl Animation {
    pub fn cycle(frames: u32, divisor: u32, positional: bool) -> Self {
        if positional {
            Self::PositionCycle { frames, divisor }
        } else {
            Self::Cycle { frames, divisor }
        }
    }
}

/// Blue component `abs(max_blue - tick % period) / divisor + offset` on one
/// packed color channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPulse {
    pub target: ColorChannel,
    pub r: u32,
    pub g: u32,
    pub max_blue: u32,
    pub period: u32,
    pub divisor: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightPulse {
    pub max: u32,
    pub period: u32,
    pub divisor: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantRecord {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_sprite: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cr: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cb: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shine: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c1: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c2: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c3: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_pulse: Option<ColorPulse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_pulse: Option<LightPulse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Body text kept for a human when the case has constructs no idiom covers.
    #[serde(skip)]
    pub needs_review: Option<String>,
}

impl VariantRecord {
    /// Set a static channel by its output field name.
    pub fn set_channel(&mut self, field: &str, value: i64) {
        let slot = match field {
            "scale" => &mut self.scale,
            "cr" => &mut self.cr,
            "cg" => &mut self.cg,
            "cb" => &mut self.cb,
            "light" => &mut self.light,
            "saturation" => &mut self.saturation,
            "shine" => &mut self.shine,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn has_animation(&self) -> bool {
        self.animation.is_some() || self.color_pulse.is_some() || self.light_pulse.is_some()
    }
}

impl Record for VariantRecord {
    fn id(&self) -> u32 {
        self.id
    }

    fn with_id(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn merge_from(&mut self, other: Self) {
        overlay!(
            self,
            other,
            base_sprite,
            scale,
            cr,
            cg,
            cb,
            light,
            saturation,
            shine,
            c1,
            c2,
            c3,
        );
        if other.animation.is_some() {
            self.animation = other.animation;
        }
        if other.color_pulse.is_some() {
            self.color_pulse = other.color_pulse;
        }
        if other.light_pulse.is_some() {
            self.light_pulse = other.light_pulse;
        }
        if other.comment.is_some() {
            self.comment = other.comment;
        }
        if other.needs_review.is_some() {
            self.needs_review = other.needs_review;
        }
    }

    /// `comment` alone does not make a record worth keeping.
    fn is_empty(&self) -> bool {
        self.base_sprite.is_none()
            && self.scale.is_none()
            && self.cr.is_none()
            && self.cg.is_none()
            && self.cb.is_none()
            && self.light.is_none()
            && self.saturation.is_none()
            && self.shine.is_none()
            && self.c1.is_none()
            && self.c2.is_none()
            && self.c3.is_none()
            && !self.has_animation()
    }
}
