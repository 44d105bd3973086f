use serenity::builder::CreateEmbed;

pub struct Response {
    pub content: Option<String>,
    pub embeds: Option<Vec<CreateEmbed>>,
    pub ephemeral: bool,
}

#[derive(Debug)]
pub enum ResponseError {
    Serenity(serenity::Error),
    Execution(&'static str, Option<String>),
}

pub type ResponseResult = Result<(), ResponseError>;

impl Response {
    pub fn new() -> Self {
        Response {
            content: None,
            embeds: None,
            ephemeral: false,
        }
    }

    pub fn content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds = Some(vec![embed]);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}
