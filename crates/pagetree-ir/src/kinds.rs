//! The fixed set of element kinds the transducer knows how to produce.

/// Source element kinds, keyed by their `data-type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    ContentNode,
    Section,
    Row,
    Col,
    ColInner,
    Flex,
    Headline,
    SubHeadline,
    Paragraph,
    Button,
    Image,
    Icon,
    Video,
    Divider,
    Input,
    TextArea,
    SelectBox,
    Checkbox,
    BulletList,
    ProgressBar,
    VideoPopup,
    Countdown,
    CheckoutPlaceholder,
    OrderSummaryPlaceholder,
    ConfirmationPlaceholder,
    Modal,
}

impl ElementKind {
    pub const ALL: [ElementKind; 26] = [
        ElementKind::ContentNode,
        ElementKind::Section,
        ElementKind::Row,
        ElementKind::Col,
        ElementKind::ColInner,
        ElementKind::Flex,
        ElementKind::Headline,
        ElementKind::SubHeadline,
        ElementKind::Paragraph,
        ElementKind::Button,
        ElementKind::Image,
        ElementKind::Icon,
        ElementKind::Video,
        ElementKind::Divider,
        ElementKind::Input,
        ElementKind::TextArea,
        ElementKind::SelectBox,
        ElementKind::Checkbox,
        ElementKind::BulletList,
        ElementKind::ProgressBar,
        ElementKind::VideoPopup,
        ElementKind::Countdown,
        ElementKind::CheckoutPlaceholder,
        ElementKind::OrderSummaryPlaceholder,
        ElementKind::ConfirmationPlaceholder,
        ElementKind::Modal,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// The `data-type` value identifying this kind in the source.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::ContentNode => "ContentNode",
            ElementKind::Section => "SectionContainer/V1",
            ElementKind::Row => "RowContainer/V1",
            ElementKind::Col => "ColContainer/V1",
            ElementKind::ColInner => "ColInner/V1",
            ElementKind::Flex => "FlexContainer/V1",
            ElementKind::Headline => "Headline/V1",
            ElementKind::SubHeadline => "SubHeadline/V1",
            ElementKind::Paragraph => "Paragraph/V1",
            ElementKind::Button => "Button/V1",
            ElementKind::Image => "Image/V2",
            ElementKind::Icon => "Icon/V1",
            ElementKind::Video => "Video/V1",
            ElementKind::Divider => "Divider/V1",
            ElementKind::Input => "Input/V1",
            ElementKind::TextArea => "TextArea/V1",
            ElementKind::SelectBox => "SelectBox/V1",
            ElementKind::Checkbox => "Checkbox/V1",
            ElementKind::BulletList => "BulletList/V1",
            ElementKind::ProgressBar => "ProgressBar/V1",
            ElementKind::VideoPopup => "VideoPopup/V1",
            ElementKind::Countdown => "Countdown/V1",
            ElementKind::CheckoutPlaceholder => "CheckoutPlaceholder",
            ElementKind::OrderSummaryPlaceholder => "OrderSummaryPlaceholder",
            ElementKind::ConfirmationPlaceholder => "ConfirmationPlaceholder",
            ElementKind::Modal => "ModalContainer/V1",
        }
    }

    /// The `type` written on the produced node. Placeholders map onto the
    /// platform's real element types; everything else keeps its tag.
    pub fn output_kind(self) -> &'static str {
        match self {
            ElementKind::CheckoutPlaceholder => "Checkout/V2",
            ElementKind::OrderSummaryPlaceholder => "CheckoutOrderSummary/V1",
            ElementKind::ConfirmationPlaceholder => "OrderConfirmation/V1",
            other => other.tag(),
        }
    }

    /// Container kinds recurse into their own source children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ElementKind::ContentNode
                | ElementKind::Section
                | ElementKind::Row
                | ElementKind::Col
                | ElementKind::Flex
                | ElementKind::Modal
        )
    }

    /// Wrappers that never produce a node; their children are spliced into
    /// the enclosing container.
    pub fn is_transparent(self) -> bool {
        self == ElementKind::ColInner
    }

    /// Whether a container of this kind keeps a child of kind `child`.
    pub fn accepts_child(self, child: ElementKind) -> bool {
        match self {
            ElementKind::ContentNode | ElementKind::Modal => child == ElementKind::Section,
            ElementKind::Section => child == ElementKind::Row,
            ElementKind::Row => child == ElementKind::Col,
            ElementKind::Col | ElementKind::Flex => !matches!(
                child,
                ElementKind::ContentNode | ElementKind::Section | ElementKind::Modal
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("Carousel/V1"), None);
    }

    #[test]
    fn placeholders_emit_platform_types() {
        assert_eq!(ElementKind::CheckoutPlaceholder.output_kind(), "Checkout/V2");
        assert_eq!(ElementKind::Headline.output_kind(), "Headline/V1");
    }

    #[test]
    fn layout_nesting_is_enforced() {
        assert!(ElementKind::Section.accepts_child(ElementKind::Row));
        assert!(!ElementKind::Section.accepts_child(ElementKind::Headline));
        assert!(ElementKind::Col.accepts_child(ElementKind::Flex));
        assert!(ElementKind::Flex.accepts_child(ElementKind::Button));
        assert!(!ElementKind::Headline.is_container());
    }
}
